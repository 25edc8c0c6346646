mod direct;
mod drt;
mod ibl;
mod path_tracer;

pub use direct::*;
pub use drt::*;
pub use ibl::*;
pub use path_tracer::*;

use crate::core::{color::Spectrum, intersection::ShadingPoint, rng::SamplingContext,
    scene::ShadingContext};

/// A lighting engine computes the radiance leaving a hit point toward
/// its ray origin. One instance per rendering thread; `finalize` is
/// called by the scheduler at teardown to report statistics.
#[enum_dispatch::enum_dispatch(LightingEngine)]
pub trait LightingEngineT: Send {
    fn compute_lighting(
        &mut self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        shading_point: &ShadingPoint,
        radiance: &mut Spectrum,
    );

    fn finalize(&self);
}

#[enum_dispatch::enum_dispatch]
pub enum LightingEngine {
    DrtLightingEngine,
}
