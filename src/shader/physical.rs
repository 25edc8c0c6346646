use crate::{
    core::{color::Spectrum, intersection::ShadingPoint, rng::SamplingContext,
        scene::ShadingContext},
    lighting::{LightingEngine, LightingEngineT},
};

use super::{ShadingResult, SurfaceShaderT};

/// Standard shader: the sample color is whatever the lighting engine
/// computes at the hit point.
pub struct PhysicalSurfaceShader;

impl PhysicalSurfaceShader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhysicalSurfaceShader {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceShaderT for PhysicalSurfaceShader {
    fn evaluate(
        &self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        engine: &mut LightingEngine,
        shading_point: &ShadingPoint,
        result: &mut ShadingResult,
    ) {
        let mut radiance = Spectrum::BLACK;
        engine.compute_lighting(ctx, shading_ctx, shading_point, &mut radiance);
        result.color = radiance;
        result.alpha = 1.0;
    }
}
