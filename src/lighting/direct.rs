use crate::{
    bsdf::{Bsdf, BsdfT},
    core::{color::Spectrum, intersection::ShadingPoint, mis::power_heuristic, ray::Ray,
        scene::ShadingContext},
    light_sampler::LightSample,
};

/// MIS-weighted next-event estimation over a set of pre-drawn light
/// samples. Delta lights have no competing BSDF strategy and are taken
/// at full weight.
///
/// `sample_count` is the number of draws the sampler was asked for, not
/// the number it produced. Draws rejected below the horizon or with a
/// zero pdf are zero-contribution outcomes of the estimator and must
/// stay in the denominator.
pub fn compute_direct_lighting(
    shading_ctx: &ShadingContext,
    shading_point: &ShadingPoint,
    outgoing: glam::Vec3A,
    bsdf: &Bsdf,
    samples: &[LightSample],
    sample_count: u32,
) -> Spectrum {
    if sample_count == 0 || samples.is_empty() {
        return Spectrum::BLACK;
    }

    let wo = shading_point.basis.to_local(outgoing);
    let mut radiance = Spectrum::BLACK;

    for sample in samples {
        let wi = shading_point.basis.to_local(sample.dir);
        if wi.z <= 0.0 {
            continue;
        }

        let value = bsdf.eval(wo, wi);
        if value.is_black() {
            continue;
        }

        let mut shadow_ray = Ray::new(shading_point.position, sample.dir);
        shadow_ray.t_min = Ray::T_MIN_EPS / wi.z.max(0.00001);
        if shading_ctx
            .intersector()
            .intersect_test(&shadow_ray, sample.distance - 0.001)
        {
            continue;
        }

        let weight = if sample.delta {
            1.0
        } else {
            power_heuristic(sample.probability, bsdf.pdf(wo, wi))
        };
        radiance += sample.radiance * value * wi.z * weight / sample.probability;
    }

    radiance / sample_count as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bsdf::LambertBsdf,
        core::{coord::Coordinate, material::Material, scene::Scene},
        light::PointLight,
        light_sampler::{LightSamplerT, UniformLightSampler},
        primitive::{Aggregate, ScenePrimitive, Sphere},
        camera::PerspectiveCamera,
        core::rng::SamplingContext,
    };
    use std::sync::Arc;

    fn empty_scene() -> Scene {
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 0.0, 5.0),
            -glam::Vec3A::Z,
            glam::Vec3A::Y,
            std::f32::consts::FRAC_PI_3,
        );
        Scene::new(Aggregate::new(Vec::new()), Vec::new(), None, camera.into())
    }

    #[test]
    fn test_zero_samples_contribute_zero() {
        let scene = empty_scene();
        let shading_ctx = ShadingContext::new(&scene);
        let material = Material::new(LambertBsdf::new(Spectrum::gray(0.5)).into(), None);
        let n = glam::Vec3A::Z;
        let sp = ShadingPoint {
            position: glam::Vec3A::ZERO,
            geometric_normal: n,
            shading_normal: n,
            basis: Coordinate::from_z(n, n),
            distance: 1.0,
            outgoing: n,
            material: &material,
            primitive: 0,
        };
        let radiance =
            compute_direct_lighting(&shading_ctx, &sp, n, material.bsdf(), &[], 4);
        assert!(radiance.is_black());
    }

    #[test]
    fn test_point_light_matches_analytic_value() {
        // unoccluded Lambertian surface under one delta light:
        // L = albedo/pi * I/d^2 * cos(theta), deterministic
        let scene = empty_scene();
        let shading_ctx = ShadingContext::new(&scene);
        let albedo = 0.6;
        let material = Material::new(LambertBsdf::new(Spectrum::gray(albedo)).into(), None);
        let n = glam::Vec3A::Z;
        let sp = ShadingPoint {
            position: glam::Vec3A::ZERO,
            geometric_normal: n,
            shading_normal: n,
            basis: Coordinate::from_z(n, n),
            distance: 1.0,
            outgoing: n,
            material: &material,
            primitive: 0,
        };

        let intensity = 16.0;
        let light: crate::light::Light =
            PointLight::new(glam::Vec3A::new(0.0, 3.0, 4.0), Spectrum::gray(intensity)).into();
        let sampler = UniformLightSampler::new(vec![Arc::new(light)]);
        let mut ctx = SamplingContext::with_seed(31);
        let mut samples = Vec::new();
        sampler.sample(&mut ctx, sp.position, n, 1, &mut samples);
        assert_eq!(samples.len(), 1);

        let radiance =
            compute_direct_lighting(&shading_ctx, &sp, n, material.bsdf(), &samples, 1);
        let dist_sqr = 25.0;
        let cos = 4.0 / 5.0;
        let expected = albedo * std::f32::consts::FRAC_1_PI * intensity / dist_sqr * cos;
        assert!((radiance.band(0) - expected).abs() / expected < 1e-4);
    }

    #[test]
    fn test_rejected_draws_still_count() {
        // two point lights, one hidden below the horizon. Draws landing
        // on the hidden light are zero-contribution outcomes, not
        // discards, so the estimate must stay the visible light's share
        // rather than inflate toward its full value.
        let scene = empty_scene();
        let shading_ctx = ShadingContext::new(&scene);
        let albedo = 0.6;
        let material = Material::new(LambertBsdf::new(Spectrum::gray(albedo)).into(), None);
        let n = glam::Vec3A::Z;
        let sp = ShadingPoint {
            position: glam::Vec3A::ZERO,
            geometric_normal: n,
            shading_normal: n,
            basis: Coordinate::from_z(n, n),
            distance: 1.0,
            outgoing: n,
            material: &material,
            primitive: 0,
        };

        let intensity = 16.0;
        let above: crate::light::Light =
            PointLight::new(glam::Vec3A::new(0.0, 0.0, 5.0), Spectrum::gray(intensity)).into();
        let below: crate::light::Light =
            PointLight::new(glam::Vec3A::new(0.0, 0.0, -5.0), Spectrum::gray(intensity)).into();
        let sampler = UniformLightSampler::new(vec![Arc::new(above), Arc::new(below)]);

        let mut ctx = SamplingContext::with_seed(37);
        let requested = 4;
        let rounds = 8000;
        let mut samples = Vec::new();
        let mut mean = 0.0;
        for _ in 0..rounds {
            samples.clear();
            sampler.sample(&mut ctx, sp.position, n, requested, &mut samples);
            mean += compute_direct_lighting(
                &shading_ctx,
                &sp,
                n,
                material.bsdf(),
                &samples,
                requested,
            )
            .band(0);
        }
        mean /= rounds as f32;

        // only the head-on light contributes: albedo/pi * I/d^2
        let expected = albedo * std::f32::consts::FRAC_1_PI * intensity / 25.0;
        assert!((mean - expected).abs() / expected < 0.03);
    }
}
