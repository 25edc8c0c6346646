use crate::{
    core::{color::Spectrum, rng::SamplingContext},
    primitive::Sphere,
};

use super::LightT;

/// Area emitter over one sphere primitive. Keeps its own copy of the
/// geometry so sampling needs no aggregate access; `primitive` ties it
/// back to the hit record for pdf evaluation.
pub struct SphereLight {
    sphere: Sphere,
    radiance: Spectrum,
    primitive: usize,
}

impl SphereLight {
    pub fn new(sphere: Sphere, radiance: Spectrum, primitive: usize) -> Self {
        Self {
            sphere,
            radiance,
            primitive,
        }
    }

    pub fn primitive(&self) -> usize {
        self.primitive
    }

    /// Area-measure density of choosing any given point on the emitter.
    pub fn pdf_area(&self) -> f32 {
        self.sphere.pdf_area()
    }
}

impl LightT for SphereLight {
    fn sample(
        &self,
        position: glam::Vec3A,
        ctx: &mut SamplingContext,
    ) -> (glam::Vec3A, f32, Spectrum, f32) {
        let (light_position, light_normal, pdf_area) = self.sphere.sample_surface(ctx);
        let vec = light_position - position;
        let dist_sqr = vec.length_squared();
        let dist = dist_sqr.sqrt();
        let dir = vec / dist;

        let cos = light_normal.dot(-dir);
        if cos <= 0.0 {
            // back face of the emitter, stratification failed
            return (dir, 0.0, Spectrum::BLACK, dist);
        }

        // area measure to solid angle at the receiver
        let pdf = pdf_area * dist_sqr / cos;
        (dir, pdf, self.radiance, dist)
    }

    fn is_delta(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SamplingContext;

    #[test]
    fn test_sampled_direction_points_at_emitter() {
        let light = SphereLight::new(
            Sphere::new(glam::Vec3A::new(0.0, 5.0, 0.0), 1.0),
            Spectrum::gray(10.0),
            0,
        );
        let mut ctx = SamplingContext::with_seed(17);
        let receiver = glam::Vec3A::ZERO;
        let mut visible = 0;
        for _ in 0..64 {
            let (dir, pdf, radiance, dist) = light.sample(receiver, &mut ctx);
            if pdf > 0.0 {
                visible += 1;
                assert!(dir.y > 0.0);
                assert!(dist > 3.0 && dist < 7.0);
                assert_eq!(radiance, Spectrum::gray(10.0));
            }
        }
        // roughly half the surface faces the receiver
        assert!(visible > 0);
    }
}
