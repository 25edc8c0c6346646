mod ao;
mod physical;

pub use ao::*;
pub use physical::*;

use crate::{
    core::{color::Spectrum, intersection::ShadingPoint, rng::SamplingContext,
        scene::ShadingContext},
    lighting::LightingEngine,
};

/// Color and opacity produced for one camera sample.
#[derive(Copy, Clone, Debug)]
pub struct ShadingResult {
    pub color: Spectrum,
    pub alpha: f32,
}

impl ShadingResult {
    pub fn transparent_black() -> Self {
        Self {
            color: Spectrum::BLACK,
            alpha: 0.0,
        }
    }
}

/// Turns a hit point into a shading result. The physical shader defers
/// to the lighting engine; diagnostic shaders ignore it.
#[enum_dispatch::enum_dispatch(SurfaceShader)]
pub trait SurfaceShaderT: Send + Sync {
    fn evaluate(
        &self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        engine: &mut LightingEngine,
        shading_point: &ShadingPoint,
        result: &mut ShadingResult,
    );
}

#[enum_dispatch::enum_dispatch]
pub enum SurfaceShader {
    PhysicalSurfaceShader,
    AoSurfaceShader,
}
