mod uniform;

pub use uniform::*;

use crate::core::{color::Spectrum, intersection::ShadingPoint, rng::SamplingContext};

/// One candidate light contribution at a shading point.
#[derive(Copy, Clone, Debug)]
pub struct LightSample {
    /// Unit direction from the shading point toward the light.
    pub dir: glam::Vec3A,
    pub distance: f32,
    pub radiance: Spectrum,
    /// Solid-angle density of having drawn this sample.
    pub probability: f32,
    pub delta: bool,
}

/// Light sampling contract consumed by the lighting kernel.
#[enum_dispatch::enum_dispatch(LightSampler)]
pub trait LightSamplerT: Send + Sync {
    /// Append up to `count` weighted samples visible in the hemisphere
    /// around `normal`. Fewer (or zero) appended samples simply means no
    /// direct light reaches this point.
    fn sample(
        &self,
        ctx: &mut SamplingContext,
        position: glam::Vec3A,
        normal: glam::Vec3A,
        count: u32,
        samples: &mut Vec<LightSample>,
    );

    /// Area-measure density of having chosen this exact hit point through
    /// light sampling. Zero for non-emissive hits.
    fn evaluate_pdf(&self, shading_point: &ShadingPoint) -> f32;

    fn num_lights(&self) -> usize;
}

#[enum_dispatch::enum_dispatch]
pub enum LightSampler {
    UniformLightSampler,
}
