mod sphere;

pub use sphere::*;

use crate::core::{
    coord::Coordinate, intersection::ShadingPoint, material::Material, ray::Ray,
};

/// A sphere bound to its material, addressable by index within the
/// aggregate.
pub struct ScenePrimitive {
    sphere: Sphere,
    material: Material,
}

impl ScenePrimitive {
    pub fn new(sphere: Sphere, material: Material) -> Self {
        Self { sphere, material }
    }

    #[allow(dead_code)]
    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

/// Linear collection of primitives implementing the intersection contract
/// consumed by the lighting kernel.
pub struct Aggregate {
    primitives: Vec<ScenePrimitive>,
}

impl Aggregate {
    pub fn new(primitives: Vec<ScenePrimitive>) -> Self {
        Self { primitives }
    }

    #[allow(dead_code)]
    pub fn primitive(&self, index: usize) -> &ScenePrimitive {
        &self.primitives[index]
    }

    pub fn intersect(&self, ray: &Ray) -> Option<ShadingPoint<'_>> {
        let mut nearest = f32::MAX;
        let mut nearest_index = None;
        for (index, primitive) in self.primitives.iter().enumerate() {
            if let Some(t) = primitive.sphere.intersect(ray, nearest) {
                nearest = t;
                nearest_index = Some(index);
            }
        }

        let index = nearest_index?;
        let primitive = &self.primitives[index];
        let position = ray.point_at(nearest);
        let geometric_normal = primitive.sphere.normal_at(position);
        // the shading frame always faces the incoming ray
        let shading_normal = if ray.direction.dot(geometric_normal) > 0.0 {
            -geometric_normal
        } else {
            geometric_normal
        };
        Some(ShadingPoint {
            position,
            geometric_normal,
            shading_normal,
            basis: Coordinate::from_z(shading_normal, shading_normal),
            distance: nearest,
            outgoing: -ray.direction,
            material: &primitive.material,
            primitive: index,
        })
    }

    pub fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        self.primitives
            .iter()
            .any(|primitive| primitive.sphere.intersect_test(ray, t_max))
    }
}
