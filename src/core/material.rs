use crate::{bsdf::Bsdf, edf::Edf};

/// Surface appearance: how the surface scatters light, and optionally how
/// it emits light. A material with no EDF simply emits nothing.
pub struct Material {
    bsdf: Bsdf,
    edf: Option<Edf>,
}

impl Material {
    pub fn new(bsdf: Bsdf, edf: Option<Edf>) -> Self {
        Self { bsdf, edf }
    }

    pub fn bsdf(&self) -> &Bsdf {
        &self.bsdf
    }

    pub fn edf(&self) -> Option<&Edf> {
        self.edf.as_ref()
    }
}
