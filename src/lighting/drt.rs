use std::sync::Arc;

use crate::{
    bsdf::{Bsdf, BsdfT, ModeMask, ScatteringMode},
    core::{color::Spectrum, intersection::ShadingPoint, loader::InputParams,
        mis::power_heuristic, population::Population, ray::Ray, rng::SamplingContext,
        scene::ShadingContext},
    edf::EdfT,
    light_sampler::{LightSample, LightSampler, LightSamplerT},
};

use super::{
    direct::compute_direct_lighting, ibl::compute_image_based_lighting,
    path_tracer::PathTracer, path_tracer::VertexVisitor, LightingEngine, LightingEngineT,
};

/// Distribution-ray-tracing engine parameters.
#[derive(Copy, Clone, Debug)]
pub struct DrtParams {
    /// maximum reflection depth
    pub max_reflection_depth: u32,
    /// maximum refraction depth
    pub max_refraction_depth: u32,
    /// minimum path length before Russian roulette is used
    pub minimum_path_length: u32,
    /// number of samples used to estimate direct illumination
    pub dl_sample_count: u32,
    /// number of samples (in BSDF sampling) used to estimate IBL
    pub ibl_bsdf_sample_count: u32,
    /// number of samples (in environment sampling) used to estimate IBL
    pub ibl_env_sample_count: u32,
}

impl Default for DrtParams {
    fn default() -> Self {
        Self {
            max_reflection_depth: 8,
            max_refraction_depth: 8,
            minimum_path_length: 3,
            dl_sample_count: 1,
            ibl_bsdf_sample_count: 2,
            ibl_env_sample_count: 2,
        }
    }
}

impl DrtParams {
    pub fn from_params(params: &mut InputParams) -> Self {
        let defaults = Self::default();
        Self {
            max_reflection_depth: params
                .get_int_or("max_reflection_depth", defaults.max_reflection_depth),
            max_refraction_depth: params
                .get_int_or("max_refraction_depth", defaults.max_refraction_depth),
            minimum_path_length: params
                .get_int_or("minimum_path_length", defaults.minimum_path_length),
            dl_sample_count: params.get_int_or("dl_samples", defaults.dl_sample_count),
            ibl_bsdf_sample_count: params
                .get_int_or("ibl_bsdf_samples", defaults.ibl_bsdf_sample_count),
            ibl_env_sample_count: params
                .get_int_or("ibl_env_samples", defaults.ibl_env_sample_count),
        }
    }
}

#[derive(Default)]
struct DrtStatistics {
    path_count: u64,
    path_depth: Population,
}

/// Per-vertex lighting policy of the DRT engine: direct lighting over
/// drawn light samples, image-based lighting, then MIS-weighted emission.
pub struct DrtVertexVisitor<'a> {
    light_sampler: &'a LightSampler,
    params: &'a DrtParams,
    light_samples: &'a mut Vec<LightSample>,
}

impl<'a> DrtVertexVisitor<'a> {
    pub fn new(
        light_sampler: &'a LightSampler,
        params: &'a DrtParams,
        light_samples: &'a mut Vec<LightSample>,
    ) -> Self {
        Self {
            light_sampler,
            params,
            light_samples,
        }
    }
}

impl VertexVisitor for DrtVertexVisitor<'_> {
    fn get_vertex_radiance(
        &mut self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        shading_point: &ShadingPoint,
        outgoing: glam::Vec3A,
        bsdf: &Bsdf,
        prev_mode: ScatteringMode,
        prev_prob: f32,
        vertex_radiance: &mut Spectrum,
    ) {
        // refill the reusable sample buffer, keeping its capacity
        self.light_samples.clear();
        self.light_sampler.sample(
            ctx,
            shading_point.position,
            shading_point.shading_normal,
            self.params.dl_sample_count,
            self.light_samples,
        );

        *vertex_radiance += compute_direct_lighting(
            shading_ctx,
            shading_point,
            outgoing,
            bsdf,
            self.light_samples,
            self.params.dl_sample_count,
        );

        *vertex_radiance += compute_image_based_lighting(
            ctx,
            shading_ctx,
            shading_point,
            outgoing,
            bsdf,
            self.params.ibl_bsdf_sample_count,
            self.params.ibl_env_sample_count,
        );

        if let Some(edf) = shading_point.material.edf() {
            let mut emitted = edf.evaluate(
                shading_point.geometric_normal,
                &shading_point.basis,
                outgoing,
            );

            if !emitted.is_black() && prev_mode != ScatteringMode::Specular {
                // density with respect to surface area of choosing this
                // point through light sampling
                let sample_probability = self.light_sampler.evaluate_pdf(shading_point);

                // density of the BSDF-sampled direction, converted from
                // solid angle to area measure
                let mut px = prev_prob;
                px *= outgoing.dot(shading_point.shading_normal).max(0.0);
                px /= shading_point.distance * shading_point.distance;

                emitted *= power_heuristic(px, sample_probability);
            }

            *vertex_radiance += emitted;
        }
    }

    fn get_environment_radiance(
        &self,
        _ray: &Ray,
        _environment_radiance: &mut Spectrum,
    ) -> bool {
        // the environment term is folded into the per-vertex IBL
        // estimate; counting it again at the miss point would double it
        false
    }
}

/// One DRT lighting engine instance. Each rendering thread owns one,
/// together with its reusable light-sample buffer and statistics.
pub struct DrtLightingEngine {
    light_sampler: Arc<LightSampler>,
    params: DrtParams,
    stats: DrtStatistics,
    light_samples: Vec<LightSample>,
}

impl DrtLightingEngine {
    pub fn new(light_sampler: Arc<LightSampler>, params: DrtParams) -> Self {
        Self {
            light_sampler,
            params,
            stats: DrtStatistics::default(),
            light_samples: Vec::new(),
        }
    }
}

impl LightingEngineT for DrtLightingEngine {
    fn compute_lighting(
        &mut self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        shading_point: &ShadingPoint,
        radiance: &mut Spectrum,
    ) {
        *radiance = Spectrum::BLACK;

        let mut visitor = DrtVertexVisitor::new(
            self.light_sampler.as_ref(),
            &self.params,
            &mut self.light_samples,
        );
        let mut path_tracer = PathTracer::new(
            &mut visitor,
            ModeMask::GLOSSY | ModeMask::SPECULAR,
            self.params.max_reflection_depth,
            self.params.max_refraction_depth,
            self.params.minimum_path_length,
        );

        let path_length = path_tracer.trace(ctx, shading_ctx, shading_point, radiance);

        self.stats.path_count += 1;
        self.stats.path_depth.insert(path_length as u64);
    }

    fn finalize(&self) {
        log::debug!(
            "distribution ray tracing statistics: paths {}, ray tree depth avg {:.1} min {} max {} dev {:.1}",
            self.stats.path_count,
            self.stats.path_depth.avg(),
            self.stats.path_depth.min(),
            self.stats.path_depth.max(),
            self.stats.path_depth.dev(),
        );
    }
}

/// Creates one engine instance per rendering thread, all bound to the
/// same read-only light sampler.
pub struct DrtLightingEngineFactory {
    light_sampler: Arc<LightSampler>,
    params: DrtParams,
}

impl DrtLightingEngineFactory {
    pub fn new(light_sampler: Arc<LightSampler>, params: DrtParams) -> Self {
        Self {
            light_sampler,
            params,
        }
    }

    pub fn create(&self) -> LightingEngine {
        DrtLightingEngine::new(self.light_sampler.clone(), self.params).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bsdf::LambertBsdf,
        camera::PerspectiveCamera,
        core::{material::Material, scene::Scene},
        edf::DiffuseEdf,
        light::{Light, PointLight, SphereLight},
        light_sampler::UniformLightSampler,
        primitive::{Aggregate, ScenePrimitive, Sphere},
    };

    fn diffuse_sphere_scene(light_intensity: f32) -> (Scene, Arc<LightSampler>) {
        let material = Material::new(LambertBsdf::new(Spectrum::gray(0.6)).into(), None);
        let aggregate = Aggregate::new(vec![ScenePrimitive::new(
            Sphere::new(glam::Vec3A::ZERO, 1.0),
            material,
        )]);
        let light: Light = PointLight::new(
            glam::Vec3A::new(0.0, 0.0, 6.0),
            Spectrum::gray(light_intensity),
        )
        .into();
        let lights = vec![Arc::new(light)];
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 0.0, 5.0),
            -glam::Vec3A::Z,
            glam::Vec3A::Y,
            std::f32::consts::FRAC_PI_3,
        );
        let sampler: Arc<LightSampler> =
            Arc::new(UniformLightSampler::new(lights.clone()).into());
        (Scene::new(aggregate, lights, None, camera.into()), sampler)
    }

    #[test]
    fn test_direct_lighting_matches_analytic_lambertian() {
        // diffuse sphere, one point light on the surface normal axis;
        // roulette disabled via a huge minimum path length. The DRT
        // continuation mask stops diffuse bounces, so the estimate is the
        // analytic direct term: albedo/pi * I/d^2.
        let intensity = 25.0;
        let (scene, sampler) = diffuse_sphere_scene(intensity);
        let shading_ctx = ShadingContext::new(&scene);

        let params = DrtParams {
            minimum_path_length: 100,
            dl_sample_count: 1,
            ..DrtParams::default()
        };
        let mut engine = DrtLightingEngine::new(sampler, params);

        let ray = Ray::new(glam::Vec3A::new(0.0, 0.0, 5.0), -glam::Vec3A::Z);
        let sp = scene.aggregate().intersect(&ray).unwrap();

        let mut ctx = SamplingContext::with_seed(61);
        let mut mean = 0.0;
        let rounds = 64;
        for _ in 0..rounds {
            let mut radiance = Spectrum::BLACK;
            engine.compute_lighting(&mut ctx, &shading_ctx, &sp, &mut radiance);
            mean += radiance.band(0);
        }
        mean /= rounds as f32;

        // light is 5 units above the hit point at (0, 0, 1), head on
        let expected = 0.6 * std::f32::consts::FRAC_1_PI * intensity / 25.0;
        assert!((mean - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_emission_unweighted_after_specular_step() {
        // an emissive sphere registered with the light sampler
        let emitted = Spectrum::gray(5.0);
        let sphere = Sphere::new(glam::Vec3A::ZERO, 1.0);
        let material = Material::new(
            LambertBsdf::new(Spectrum::gray(0.2)).into(),
            Some(DiffuseEdf::new(emitted).into()),
        );
        let aggregate = Aggregate::new(vec![ScenePrimitive::new(sphere, material)]);
        let light: Light = SphereLight::new(sphere, emitted, 0).into();
        let lights = vec![Arc::new(light)];
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 0.0, 5.0),
            -glam::Vec3A::Z,
            glam::Vec3A::Y,
            std::f32::consts::FRAC_PI_3,
        );
        let sampler: Arc<LightSampler> =
            Arc::new(UniformLightSampler::new(lights.clone()).into());
        let scene = Scene::new(aggregate, lights, None, camera.into());
        let shading_ctx = ShadingContext::new(&scene);

        let ray = Ray::new(glam::Vec3A::new(0.0, 0.0, 5.0), -glam::Vec3A::Z);
        let sp = scene.aggregate().intersect(&ray).unwrap();

        let params = DrtParams {
            // no direct or IBL noise in this test
            dl_sample_count: 0,
            ibl_bsdf_sample_count: 0,
            ibl_env_sample_count: 0,
            ..DrtParams::default()
        };
        let mut buffer = Vec::new();
        let light_sampler: LightSampler =
            UniformLightSampler::new(scene.lights().to_vec()).into();

        let mut ctx = SamplingContext::with_seed(67);

        // reached through a specular event: emission passes unweighted
        let mut visitor = DrtVertexVisitor::new(&light_sampler, &params, &mut buffer);
        let mut specular_radiance = Spectrum::BLACK;
        visitor.get_vertex_radiance(
            &mut ctx,
            &shading_ctx,
            &sp,
            sp.outgoing,
            sp.material.bsdf(),
            ScatteringMode::Specular,
            0.75,
            &mut specular_radiance,
        );
        assert!((specular_radiance.band(0) - emitted.band(0)).abs() < 1e-5);

        // reached through a diffuse event: emission is MIS-weighted down
        let mut visitor = DrtVertexVisitor::new(&light_sampler, &params, &mut buffer);
        let mut diffuse_radiance = Spectrum::BLACK;
        visitor.get_vertex_radiance(
            &mut ctx,
            &shading_ctx,
            &sp,
            sp.outgoing,
            sp.material.bsdf(),
            ScatteringMode::Diffuse,
            0.75,
            &mut diffuse_radiance,
        );
        assert!(diffuse_radiance.band(0) < specular_radiance.band(0));
        assert!(diffuse_radiance.band(0) > 0.0);
    }

    #[test]
    fn test_environment_lit_diffuse_matches_analytic() {
        // constant environment E over a Lambertian sphere, no other
        // lights: the engine's estimate must converge to albedo * E.
        // The environment lives outside the sampled light list, so only
        // the image-based lighting pass may account for it.
        let env = 2.0;
        let albedo = 0.6;
        let material = Material::new(LambertBsdf::new(Spectrum::gray(albedo)).into(), None);
        let aggregate = Aggregate::new(vec![ScenePrimitive::new(
            Sphere::new(glam::Vec3A::ZERO, 1.0),
            material,
        )]);
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 0.0, 5.0),
            -glam::Vec3A::Z,
            glam::Vec3A::Y,
            std::f32::consts::FRAC_PI_3,
        );
        let sampler: Arc<LightSampler> =
            Arc::new(UniformLightSampler::new(Vec::new()).into());
        let scene = Scene::new(
            aggregate,
            Vec::new(),
            Some(crate::light::EnvLight::new(Spectrum::gray(env))),
            camera.into(),
        );
        let shading_ctx = ShadingContext::new(&scene);

        let mut engine = DrtLightingEngine::new(sampler, DrtParams::default());

        let ray = Ray::new(glam::Vec3A::new(0.0, 0.0, 5.0), -glam::Vec3A::Z);
        let sp = scene.aggregate().intersect(&ray).unwrap();

        let mut ctx = SamplingContext::with_seed(71);
        let mut mean = 0.0;
        let rounds = 2000;
        for _ in 0..rounds {
            let mut radiance = Spectrum::BLACK;
            engine.compute_lighting(&mut ctx, &shading_ctx, &sp, &mut radiance);
            mean += radiance.band(0);
        }
        mean /= rounds as f32;

        let expected = albedo * env;
        assert!((mean - expected).abs() / expected < 0.05);
    }

    #[test]
    fn test_default_parameters() {
        let params = DrtParams::default();
        assert_eq!(params.max_reflection_depth, 8);
        assert_eq!(params.max_refraction_depth, 8);
        assert_eq!(params.minimum_path_length, 3);
        assert_eq!(params.dl_sample_count, 1);
        assert_eq!(params.ibl_bsdf_sample_count, 2);
        assert_eq!(params.ibl_env_sample_count, 2);
    }
}
