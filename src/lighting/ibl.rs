use crate::{
    bsdf::{Bsdf, BsdfT, ScatteringMode},
    core::{color::Spectrum, intersection::ShadingPoint, mis::power_heuristic, ray::Ray,
        rng::SamplingContext, scene::ShadingContext},
};

/// Two-strategy MIS estimate of the environment contribution at a
/// vertex: environment-driven and BSDF-driven sampling, each weighted
/// against the other strategy's density.
pub fn compute_image_based_lighting(
    ctx: &mut SamplingContext,
    shading_ctx: &ShadingContext,
    shading_point: &ShadingPoint,
    outgoing: glam::Vec3A,
    bsdf: &Bsdf,
    bsdf_sample_count: u32,
    env_sample_count: u32,
) -> Spectrum {
    let environment = match shading_ctx.environment() {
        Some(environment) => environment,
        None => return Spectrum::BLACK,
    };

    let wo = shading_point.basis.to_local(outgoing);
    let mut radiance = Spectrum::BLACK;

    // environment-driven samples
    if env_sample_count > 0 {
        let mut sum = Spectrum::BLACK;
        for _ in 0..env_sample_count {
            let (dir, pdf) = environment.sample(ctx);
            if pdf <= 0.0 {
                continue;
            }
            let wi = shading_point.basis.to_local(dir);
            if wi.z <= 0.0 {
                continue;
            }

            let value = bsdf.eval(wo, wi);
            if value.is_black() {
                continue;
            }

            let mut shadow_ray = Ray::new(shading_point.position, dir);
            shadow_ray.t_min = Ray::T_MIN_EPS / wi.z.max(0.00001);
            if shading_ctx.intersector().intersect_test(&shadow_ray, f32::MAX) {
                continue;
            }

            let weight = power_heuristic(pdf, bsdf.pdf(wo, wi));
            sum += environment.radiance() * value * wi.z * weight / pdf;
        }
        radiance += sum / env_sample_count as f32;
    }

    // BSDF-driven samples
    if bsdf_sample_count > 0 {
        let mut sum = Spectrum::BLACK;
        for _ in 0..bsdf_sample_count {
            let sample = match bsdf.sample(wo, ctx) {
                Some(sample) if sample.pdf > 0.0 && sample.wi.z > 0.0 => sample,
                _ => continue,
            };
            let dir = shading_point.basis.to_world(sample.wi);

            let mut shadow_ray = Ray::new(shading_point.position, dir);
            shadow_ray.t_min = Ray::T_MIN_EPS / sample.wi.z.max(0.00001);
            if shading_ctx.intersector().intersect_test(&shadow_ray, f32::MAX) {
                continue;
            }

            // specular sampling has no competing environment strategy
            let weight = if sample.mode == ScatteringMode::Specular {
                1.0
            } else {
                power_heuristic(sample.pdf, environment.pdf(dir))
            };
            sum += environment.radiance() * sample.value * sample.wi.z * weight / sample.pdf;
        }
        radiance += sum / bsdf_sample_count as f32;
    }

    radiance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bsdf::LambertBsdf,
        camera::PerspectiveCamera,
        core::{coord::Coordinate, material::Material, scene::Scene},
        light::EnvLight,
        primitive::Aggregate,
    };

    fn scene_with_env(radiance: Option<Spectrum>) -> Scene {
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 0.0, 5.0),
            -glam::Vec3A::Z,
            glam::Vec3A::Y,
            std::f32::consts::FRAC_PI_3,
        );
        Scene::new(
            Aggregate::new(Vec::new()),
            Vec::new(),
            radiance.map(EnvLight::new),
            camera.into(),
        )
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
    fn test_no_environment_is_zero() {
        let scene = scene_with_env(None);
        let shading_ctx = ShadingContext::new(&scene);
        let material = Material::new(LambertBsdf::new(Spectrum::gray(0.5)).into(), None);
        let sp = shading_point(&material);
        let mut ctx = SamplingContext::with_seed(41);
        let radiance = compute_image_based_lighting(
            &mut ctx,
            &shading_ctx,
            &sp,
            glam::Vec3A::Z,
            material.bsdf(),
            2,
            2,
        );
        assert!(radiance.is_black());
    }

    #[test]
    fn test_converges_to_analytic_white_furnace() {
        // Lambertian surface under a constant environment E:
        // L = albedo * E, independent of sampling strategy
        let env = 2.0;
        let albedo = 0.5;
        let scene = scene_with_env(Some(Spectrum::gray(env)));
        let shading_ctx = ShadingContext::new(&scene);
        let material = Material::new(LambertBsdf::new(Spectrum::gray(albedo)).into(), None);
        let sp = shading_point(&material);

        let mut ctx = SamplingContext::with_seed(43);
        let mut mean = 0.0;
        let rounds = 2000;
        for _ in 0..rounds {
            let radiance = compute_image_based_lighting(
                &mut ctx,
                &shading_ctx,
                &sp,
                glam::Vec3A::Z,
                material.bsdf(),
                2,
                2,
            );
            mean += radiance.band(0);
        }
        mean /= rounds as f32;
        let expected = albedo * env;
        assert!((mean - expected).abs() / expected < 0.05);
    }
}
