use std::{collections::HashMap, sync::Arc};

use crate::{
    core::{intersection::ShadingPoint, rng::SamplingContext},
    light::{Light, LightT},
};

use super::{LightSample, LightSamplerT};

/// Uniform light selection: every light is equally likely per sample.
pub struct UniformLightSampler {
    lights: Vec<Arc<Light>>,
    num_light_inv: f32,
    primitive_light_map: HashMap<usize, usize>,
}

impl UniformLightSampler {
    pub fn new(lights: Vec<Arc<Light>>) -> Self {
        let num_light_inv = if lights.is_empty() {
            0.0
        } else {
            1.0 / lights.len() as f32
        };

        let mut primitive_light_map = HashMap::new();
        for (index, light) in lights.iter().enumerate() {
            if let Light::SphereLight(shape) = light.as_ref() {
                primitive_light_map.insert(shape.primitive(), index);
            }
        }

        Self {
            lights,
            num_light_inv,
            primitive_light_map,
        }
    }
}

impl LightSamplerT for UniformLightSampler {
    fn sample(
        &self,
        ctx: &mut SamplingContext,
        position: glam::Vec3A,
        normal: glam::Vec3A,
        count: u32,
        samples: &mut Vec<LightSample>,
    ) {
        if self.lights.is_empty() {
            return;
        }

        for _ in 0..count {
            let index = ctx.uniform_1d() * self.lights.len() as f32;
            let index = (index as usize).min(self.lights.len() - 1);
            let light = self.lights[index].as_ref();

            let (dir, pdf, radiance, dist) = light.sample(position, ctx);
            if pdf <= 0.0 || !pdf.is_finite() || radiance.is_black() {
                continue;
            }
            if dir.dot(normal) <= 0.0 {
                continue;
            }

            samples.push(LightSample {
                dir,
                distance: dist,
                radiance,
                probability: pdf * self.num_light_inv,
                delta: light.is_delta(),
            });
        }
    }

    fn evaluate_pdf(&self, shading_point: &ShadingPoint) -> f32 {
        match self.primitive_light_map.get(&shading_point.primitive) {
            Some(&index) => {
                let light = self.lights[index].as_ref();
                if let Light::SphereLight(shape) = light {
                    shape.pdf_area() * self.num_light_inv
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    fn num_lights(&self) -> usize {
        self.lights.len()
    }
}
