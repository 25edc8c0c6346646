use crate::core::{color::Spectrum, rng::SamplingContext};

/// Constant-radiance environment surrounding the scene. Estimated
/// exclusively by the image-based lighting pass, so it never appears in
/// the sampled light list.
#[derive(Copy, Clone)]
pub struct EnvLight {
    radiance: Spectrum,
}

const UNIFORM_SPHERE_PDF: f32 = 0.25 * std::f32::consts::FRAC_1_PI;

impl EnvLight {
    pub fn new(radiance: Spectrum) -> Self {
        Self { radiance }
    }

    pub fn radiance(&self) -> Spectrum {
        self.radiance
    }

    /// Uniform direction over the sphere and its solid-angle density.
    pub fn sample(&self, ctx: &mut SamplingContext) -> (glam::Vec3A, f32) {
        (ctx.uniform_on_sphere(), UNIFORM_SPHERE_PDF)
    }

    pub fn pdf(&self, _wi: glam::Vec3A) -> f32 {
        UNIFORM_SPHERE_PDF
    }
}
