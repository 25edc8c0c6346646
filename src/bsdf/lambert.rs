use crate::core::{color::Spectrum, rng::SamplingContext};

use super::{BsdfSample, BsdfT, ScatteringDir, ScatteringMode};

pub struct LambertBsdf {
    reflectance: Spectrum,
}

impl LambertBsdf {
    pub fn new(reflectance: Spectrum) -> Self {
        Self { reflectance }
    }
}

impl BsdfT for LambertBsdf {
    fn sample(&self, wo: glam::Vec3A, ctx: &mut SamplingContext) -> Option<BsdfSample> {
        if wo.z <= 0.0 {
            return None;
        }
        let wi = ctx.cosine_weighted_on_hemisphere();
        let pdf = wi.z * std::f32::consts::FRAC_1_PI;
        if pdf <= 0.0 {
            return None;
        }
        Some(BsdfSample {
            wi,
            mode: ScatteringMode::Diffuse,
            dir: ScatteringDir::Reflect,
            pdf,
            value: self.reflectance * std::f32::consts::FRAC_1_PI,
        })
    }

    fn eval(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Spectrum {
        if wo.z * wi.z >= 0.0 {
            self.reflectance * std::f32::consts::FRAC_1_PI
        } else {
            Spectrum::BLACK
        }
    }

    fn pdf(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> f32 {
        if wo.z * wi.z >= 0.0 {
            wi.z.abs() * std::f32::consts::FRAC_1_PI
        } else {
            0.0
        }
    }

    fn is_delta(&self) -> bool {
        false
    }
}
