use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    bsdf::{Bsdf, LambertBsdf, SpecularReflectBsdf},
    camera::PerspectiveCamera,
    core::{color::Spectrum, loader::InputParams, material::Material, scene::Scene},
    edf::DiffuseEdf,
    light::{EnvLight, Light, PointLight, SphereLight},
    light_sampler::UniformLightSampler,
    lighting::{DrtLightingEngineFactory, DrtParams},
    primitive::{Aggregate, ScenePrimitive, Sphere},
    renderer::Renderer,
    shader::{AoSurfaceShader, PhysicalSurfaceShader, SurfaceShader},
};

pub struct OutputConfig {
    pub file: String,
}

/// Build a renderer from a JSON scene description.
pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<(Renderer, OutputConfig)> {
    let json_file = std::fs::File::open(path.as_ref())
        .context(format!("can't open '{}'", path.as_ref().display()))?;
    let json_reader = std::io::BufReader::new(json_file);
    let json_value: serde_json::Value = serde_json::from_reader(json_reader)?;
    let root = json_value
        .as_object()
        .context("top: scene description should be an object")?
        .clone();
    let mut params = InputParams::new(root, "top".into());

    let mut output_params = params.get_object("output")?;
    let file = output_params.get_str("file")?;
    let width = output_params.get_int("width")?;
    let height = output_params.get_int("height")?;
    let spp = output_params.get_int_or("spp", 1);
    output_params.check_unused_keys();

    let mut camera_params = params.get_object("camera")?;
    let ty = camera_params.get_str_or("type", "perspective");
    anyhow::ensure!(
        ty == "perspective",
        format!("camera: unknown type '{}'", ty)
    );
    let camera = PerspectiveCamera::load(&mut camera_params)?;
    camera_params.check_unused_keys();

    let drt_params = if params.contains_key("lighting") {
        let mut lighting_params = params.get_object("lighting")?;
        let ty = lighting_params.get_str_or("type", "drt");
        anyhow::ensure!(ty == "drt", format!("lighting: unknown type '{}'", ty));
        let drt_params = DrtParams::from_params(&mut lighting_params);
        lighting_params.check_unused_keys();
        drt_params
    } else {
        DrtParams::default()
    };

    let (primitives, mut lights) = if params.contains_key("primitives") {
        load_primitives(params.get_object_array("primitives")?)?
    } else {
        (Vec::new(), Vec::new())
    };

    if params.contains_key("lights") {
        for mut light_params in params.get_object_array("lights")? {
            lights.push(Arc::new(load_light(&mut light_params)?));
        }
    }

    // the environment is estimated by the image-based lighting pass
    // only; registering it with the light sampler as well would count
    // its contribution twice
    let environment = if params.contains_key("environment") {
        let mut env_params = params.get_object("environment")?;
        let radiance = env_params.get_float3("radiance")?;
        env_params.check_unused_keys();
        Some(EnvLight::new(Spectrum::from(radiance)))
    } else {
        None
    };

    let shader: SurfaceShader = if params.contains_key("shader") {
        let mut shader_params = params.get_object("shader")?;
        let ty = shader_params.get_str_or("type", "physical");
        let shader = match ty.as_str() {
            "physical" => PhysicalSurfaceShader::new().into(),
            "ao" => AoSurfaceShader::load(&mut shader_params)?.into(),
            _ => anyhow::bail!(format!("shader: unknown type '{}'", ty)),
        };
        shader_params.check_unused_keys();
        shader
    } else {
        PhysicalSurfaceShader::new().into()
    };

    let aov_names = if params.contains_key("aovs") {
        params.get_str_array("aovs")?
    } else {
        Vec::new()
    };

    params.check_unused_keys();

    let light_sampler = Arc::new(UniformLightSampler::new(lights.clone()).into());
    let engine_factory = DrtLightingEngineFactory::new(light_sampler, drt_params);
    let scene = Scene::new(Aggregate::new(primitives), lights, environment, camera.into());
    let renderer = Renderer::new(scene, shader, engine_factory, aov_names, width, height, spp)?;

    Ok((renderer, OutputConfig { file }))
}

/// Emissive primitives also produce a sphere light bound to their index,
/// so the light sampler can importance-sample them.
fn load_primitives(
    primitive_params: Vec<InputParams>,
) -> anyhow::Result<(Vec<ScenePrimitive>, Vec<Arc<Light>>)> {
    let mut primitives = Vec::with_capacity(primitive_params.len());
    let mut lights = Vec::new();

    for mut prim_params in primitive_params {
        let center = glam::Vec3A::from(prim_params.get_float3("center")?);
        let radius = prim_params.get_float("radius")?;
        anyhow::ensure!(
            radius > 0.0,
            format!("{} - 'radius' should be positive", prim_params.name())
        );
        let sphere = Sphere::new(center, radius);

        let bsdf = load_bsdf(&mut prim_params)?;

        let index = primitives.len();
        let edf = if prim_params.contains_key("radiance") {
            let radiance = Spectrum::from(prim_params.get_float3("radiance")?);
            lights.push(Arc::new(
                SphereLight::new(sphere, radiance, index).into(),
            ));
            Some(DiffuseEdf::new(radiance).into())
        } else {
            None
        };

        prim_params.check_unused_keys();
        primitives.push(ScenePrimitive::new(sphere, Material::new(bsdf, edf)));
    }

    Ok((primitives, lights))
}

fn load_bsdf(params: &mut InputParams) -> anyhow::Result<Bsdf> {
    let ty = params.get_str_or("type", "lambert");
    let reflectance = Spectrum::from(params.get_float3_or("reflectance", [0.5; 3]));
    match ty.as_str() {
        "lambert" => Ok(LambertBsdf::new(reflectance).into()),
        "specular" => Ok(SpecularReflectBsdf::new(reflectance).into()),
        _ => anyhow::bail!(format!("{} - unknown type '{}'", params.name(), ty)),
    }
}

fn load_light(params: &mut InputParams) -> anyhow::Result<Light> {
    let ty = params.get_str("type")?;
    let light = match ty.as_str() {
        "point" => {
            let position = glam::Vec3A::from(params.get_float3("position")?);
            let intensity = Spectrum::from(params.get_float3("intensity")?);
            PointLight::new(position, intensity).into()
        }
        _ => anyhow::bail!(format!("{} - unknown type '{}'", params.name(), ty)),
    };
    params.check_unused_keys();
    Ok(light)
}
