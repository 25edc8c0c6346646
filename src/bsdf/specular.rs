use crate::core::{color::Spectrum, rng::SamplingContext};

use super::{BsdfSample, BsdfT, ScatteringDir, ScatteringMode};

/// Perfect mirror. The sampled value already carries the 1/cos term so
/// that `value * cos / pdf` yields the plain reflectance.
pub struct SpecularReflectBsdf {
    reflectance: Spectrum,
}

impl SpecularReflectBsdf {
    pub fn new(reflectance: Spectrum) -> Self {
        Self { reflectance }
    }
}

impl BsdfT for SpecularReflectBsdf {
    fn sample(&self, wo: glam::Vec3A, _ctx: &mut SamplingContext) -> Option<BsdfSample> {
        if wo.z <= 0.0 {
            return None;
        }
        let wi = glam::Vec3A::new(-wo.x, -wo.y, wo.z);
        Some(BsdfSample {
            wi,
            mode: ScatteringMode::Specular,
            dir: ScatteringDir::Reflect,
            pdf: 1.0,
            value: self.reflectance / wi.z.max(0.00001),
        })
    }

    fn eval(&self, _wo: glam::Vec3A, _wi: glam::Vec3A) -> Spectrum {
        Spectrum::BLACK
    }

    fn pdf(&self, _wo: glam::Vec3A, _wi: glam::Vec3A) -> f32 {
        0.0
    }

    fn is_delta(&self) -> bool {
        true
    }
}
