use crate::{
    core::{color::Spectrum, intersection::ShadingPoint, loader::InputParams, ray::Ray,
        rng::SamplingContext, scene::ShadingContext},
    lighting::LightingEngine,
};

use super::{ShadingResult, SurfaceShaderT};

/// Fraction of the hemisphere above `shading_point` that is blocked
/// within `max_distance`, estimated with cosine-weighted rays.
pub fn compute_ambient_occlusion(
    ctx: &mut SamplingContext,
    shading_ctx: &ShadingContext,
    shading_point: &ShadingPoint,
    samples: u32,
    max_distance: f32,
) -> f32 {
    if samples == 0 {
        return 0.0;
    }

    let mut occluded = 0u32;
    for _ in 0..samples {
        let wi = ctx.cosine_weighted_on_hemisphere();
        if wi.z <= 0.0 {
            continue;
        }
        let dir = shading_point.basis.to_world(wi);
        let mut ray = Ray::new(shading_point.position, dir);
        ray.t_min = Ray::T_MIN_EPS / wi.z.max(0.00001);
        if shading_ctx.intersector().intersect_test(&ray, max_distance) {
            occluded += 1;
        }
    }

    occluded as f32 / samples as f32
}

/// Diagnostic shader rendering unoccluded fraction as a gray value.
pub struct AoSurfaceShader {
    samples: u32,
    max_distance: f32,
}

impl AoSurfaceShader {
    pub fn new(samples: u32, max_distance: f32) -> Self {
        Self {
            samples,
            max_distance,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let samples = params.get_int_or("samples", 16);
        let max_distance = params.get_float_or("max_distance", 1.0);
        anyhow::ensure!(
            max_distance > 0.0,
            format!("{} - 'max_distance' should be positive", params.name())
        );
        Ok(Self::new(samples, max_distance))
    }
}

impl SurfaceShaderT for AoSurfaceShader {
    fn evaluate(
        &self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        _engine: &mut LightingEngine,
        shading_point: &ShadingPoint,
        result: &mut ShadingResult,
    ) {
        let occlusion = compute_ambient_occlusion(
            ctx,
            shading_ctx,
            shading_point,
            self.samples,
            self.max_distance,
        );
        result.color = Spectrum::gray(1.0 - occlusion);
        result.alpha = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bsdf::LambertBsdf,
        camera::PerspectiveCamera,
        core::{coord::Coordinate, material::Material, scene::Scene},
        primitive::{Aggregate, ScenePrimitive, Sphere},
    };

    fn scene_with(primitives: Vec<ScenePrimitive>) -> Scene {
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 0.0, 5.0),
            -glam::Vec3A::Z,
            glam::Vec3A::Y,
            std::f32::consts::FRAC_PI_3,
        );
        Scene::new(Aggregate::new(primitives), Vec::new(), None, camera.into())
    }

    fn shading_point(material: &Material) -> ShadingPoint<'_> {
        let n = glam::Vec3A::Z;
        ShadingPoint {
            position: glam::Vec3A::ZERO,
            geometric_normal: n,
            shading_normal: n,
            basis: Coordinate::from_z(n, n),
            distance: 1.0,
            outgoing: n,
            material,
            primitive: 0,
        }
    }

    #[test]
    fn test_open_scene_is_unoccluded() {
        let scene = scene_with(Vec::new());
        let shading_ctx = ShadingContext::new(&scene);
        let material = Material::new(LambertBsdf::new(Spectrum::WHITE).into(), None);
        let sp = shading_point(&material);
        let mut ctx = SamplingContext::with_seed(61);
        let occlusion = compute_ambient_occlusion(&mut ctx, &shading_ctx, &sp, 16, 1.0);
        assert_eq!(occlusion, 0.0);
    }

    #[test]
    fn test_enclosed_point_is_fully_occluded() {
        let material = Material::new(LambertBsdf::new(Spectrum::WHITE).into(), None);
        let scene = scene_with(vec![ScenePrimitive::new(
            Sphere::new(glam::Vec3A::ZERO, 0.5),
            Material::new(LambertBsdf::new(Spectrum::WHITE).into(), None),
        )]);
        let shading_ctx = ShadingContext::new(&scene);
        let sp = shading_point(&material);
        let mut ctx = SamplingContext::with_seed(67);
        let occlusion = compute_ambient_occlusion(&mut ctx, &shading_ctx, &sp, 16, 1.0);
        assert_eq!(occlusion, 1.0);
    }

    #[test]
    fn test_occluder_past_max_distance_ignored() {
        let scene = scene_with(vec![ScenePrimitive::new(
            Sphere::new(glam::Vec3A::ZERO, 10.0),
            Material::new(LambertBsdf::new(Spectrum::WHITE).into(), None),
        )]);
        let shading_ctx = ShadingContext::new(&scene);
        let material = Material::new(LambertBsdf::new(Spectrum::WHITE).into(), None);
        let sp = shading_point(&material);
        let mut ctx = SamplingContext::with_seed(71);
        let occlusion = compute_ambient_occlusion(&mut ctx, &shading_ctx, &sp, 16, 1.0);
        assert_eq!(occlusion, 0.0);
    }
}
