mod environment;
mod point;
mod sphere_light;

pub use environment::*;
pub use point::*;
pub use sphere_light::*;

use crate::core::{color::Spectrum, rng::SamplingContext};

#[enum_dispatch::enum_dispatch(Light)]
pub trait LightT: Send + Sync {
    /// return (sampled direction, pdf, radiance, light dist)
    fn sample(
        &self,
        position: glam::Vec3A,
        ctx: &mut SamplingContext,
    ) -> (glam::Vec3A, f32, Spectrum, f32);

    fn is_delta(&self) -> bool;
}

#[enum_dispatch::enum_dispatch]
pub enum Light {
    PointLight,
    SphereLight,
}
