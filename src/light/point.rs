use crate::core::{color::Spectrum, rng::SamplingContext};

use super::LightT;

pub struct PointLight {
    position: glam::Vec3A,
    intensity: Spectrum,
}

impl PointLight {
    pub fn new(position: glam::Vec3A, intensity: Spectrum) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl LightT for PointLight {
    fn sample(
        &self,
        position: glam::Vec3A,
        _ctx: &mut SamplingContext,
    ) -> (glam::Vec3A, f32, Spectrum, f32) {
        let sample = self.position - position;
        let dist_sqr = sample.length_squared();
        let dist = dist_sqr.sqrt();
        let sample = sample / dist;
        (sample, 1.0, self.intensity / dist_sqr, dist)
    }

    fn is_delta(&self) -> bool {
        true
    }
}
