use std::sync::Arc;

use crate::{camera::Camera, light::EnvLight, light::Light, primitive::Aggregate};

/// Read-only scene description shared across rendering threads. Built
/// before rendering starts, never mutated afterwards.
pub struct Scene {
    aggregate: Aggregate,
    lights: Vec<Arc<Light>>,
    environment: Option<EnvLight>,
    camera: Camera,
}

impl Scene {
    pub fn new(
        aggregate: Aggregate,
        lights: Vec<Arc<Light>>,
        environment: Option<EnvLight>,
        camera: Camera,
    ) -> Self {
        Self {
            aggregate,
            lights,
            environment,
            camera,
        }
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    #[allow(dead_code)]
    pub fn lights(&self) -> &[Arc<Light>] {
        &self.lights
    }

    pub fn environment(&self) -> Option<&EnvLight> {
        self.environment.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

/// Bundles the scene services a shading computation needs: the
/// intersector for continuation and shadow rays, and the environment for
/// image-based lighting.
#[derive(Copy, Clone)]
pub struct ShadingContext<'a> {
    scene: &'a Scene,
}

impl<'a> ShadingContext<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    pub fn intersector(&self) -> &'a Aggregate {
        self.scene.aggregate()
    }

    pub fn environment(&self) -> Option<&'a EnvLight> {
        self.scene.environment()
    }
}
