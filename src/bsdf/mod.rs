mod lambert;
mod specular;

pub use lambert::*;
pub use specular::*;

use std::ops::BitOr;

use crate::core::{color::Spectrum, rng::SamplingContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatteringMode {
    Diffuse,
    Glossy,
    Specular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatteringDir {
    Reflect,
    Transmit,
}

/// Set of scattering modes, used by the path tracer to decide which
/// sampled modes spawn a continuation ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeMask(u32);

impl ModeMask {
    pub const NONE: ModeMask = ModeMask(0);
    pub const DIFFUSE: ModeMask = ModeMask(1 << 0);
    pub const GLOSSY: ModeMask = ModeMask(1 << 1);
    pub const SPECULAR: ModeMask = ModeMask(1 << 2);
    pub const ALL: ModeMask = ModeMask(0b111);

    pub fn contains(self, mode: ScatteringMode) -> bool {
        let bit = match mode {
            ScatteringMode::Diffuse => Self::DIFFUSE,
            ScatteringMode::Glossy => Self::GLOSSY,
            ScatteringMode::Specular => Self::SPECULAR,
        };
        self.0 & bit.0 != 0
    }
}

impl BitOr for ModeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        ModeMask(self.0 | rhs.0)
    }
}

/// One sampled scattering event, in the local shading frame.
#[derive(Debug, Clone, Copy)]
pub struct BsdfSample {
    pub wi: glam::Vec3A,
    pub mode: ScatteringMode,
    pub dir: ScatteringDir,
    pub pdf: f32,
    pub value: Spectrum,
}

/// Scattering contract, all directions in the local shading frame with
/// +z along the shading normal. `sample` returns `None` for
/// zero-probability or below-surface directions; the caller terminates
/// that branch.
#[enum_dispatch::enum_dispatch(Bsdf)]
pub trait BsdfT: Send + Sync {
    fn sample(&self, wo: glam::Vec3A, ctx: &mut SamplingContext) -> Option<BsdfSample>;

    fn eval(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Spectrum;

    fn pdf(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> f32;

    fn is_delta(&self) -> bool;
}

#[enum_dispatch::enum_dispatch]
pub enum Bsdf {
    LambertBsdf,
    SpecularReflectBsdf,
}
