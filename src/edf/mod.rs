use crate::core::{color::Spectrum, coord::Coordinate};

/// Emission contract: radiance emitted from a surface point in a given
/// world-space direction.
#[enum_dispatch::enum_dispatch(Edf)]
pub trait EdfT: Send + Sync {
    fn evaluate(
        &self,
        geometric_normal: glam::Vec3A,
        basis: &Coordinate,
        outgoing: glam::Vec3A,
    ) -> Spectrum;
}

#[enum_dispatch::enum_dispatch]
pub enum Edf {
    DiffuseEdf,
}

/// Constant hemispherical emitter.
pub struct DiffuseEdf {
    radiance: Spectrum,
}

impl DiffuseEdf {
    pub fn new(radiance: Spectrum) -> Self {
        Self { radiance }
    }

    #[allow(dead_code)]
    pub fn radiance(&self) -> Spectrum {
        self.radiance
    }
}

impl EdfT for DiffuseEdf {
    fn evaluate(
        &self,
        geometric_normal: glam::Vec3A,
        _basis: &Coordinate,
        outgoing: glam::Vec3A,
    ) -> Spectrum {
        if outgoing.dot(geometric_normal) > 0.0 {
            self.radiance
        } else {
            Spectrum::BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emits_into_upper_hemisphere_only() {
        let edf = DiffuseEdf::new(Spectrum::gray(4.0));
        let n = glam::Vec3A::Z;
        let basis = Coordinate::from_z(n, n);
        let above = glam::Vec3A::new(0.2, 0.1, 0.9).normalize();
        assert_eq!(edf.evaluate(n, &basis, above), Spectrum::gray(4.0));
        assert!(edf.evaluate(n, &basis, -above).is_black());
    }
}
