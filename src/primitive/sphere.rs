use crate::core::{ray::Ray, rng::SamplingContext};

#[derive(Copy, Clone, Debug)]
pub struct Sphere {
    center: glam::Vec3A,
    radius: f32,
}

impl Sphere {
    pub fn new(center: glam::Vec3A, radius: f32) -> Self {
        Self { center, radius }
    }

    #[allow(dead_code)]
    pub fn center(&self) -> glam::Vec3A {
        self.center
    }

    #[allow(dead_code)]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn area(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.radius * self.radius
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;
        let delta = b * b - a * c;
        if delta >= 0.0 {
            let delta = delta.sqrt();
            let min = (-b - delta) / a;
            let max = (-b + delta) / a;
            Some((min, max))
        } else {
            None
        }
    }

    /// Nearest hit distance past `ray.t_min` and below `t_max`.
    pub fn intersect(&self, ray: &Ray, t_max: f32) -> Option<f32> {
        let (min, max) = self.intersect_ray(ray)?;
        let t = if min < ray.t_min { max } else { min };
        if ray.t_min < t && t < t_max {
            Some(t)
        } else {
            None
        }
    }

    pub fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        if let Some((min, max)) = self.intersect_ray(ray) {
            min < t_max && max > ray.t_min
        } else {
            false
        }
    }

    pub fn normal_at(&self, position: glam::Vec3A) -> glam::Vec3A {
        (position - self.center) / self.radius
    }

    /// Uniform sample on the surface, returning position, normal and the
    /// area-measure density.
    pub fn sample_surface(&self, ctx: &mut SamplingContext) -> (glam::Vec3A, glam::Vec3A, f32) {
        let normal = ctx.uniform_on_sphere();
        let position = self.center + normal * self.radius;
        (position, normal, 1.0 / self.area())
    }

    pub fn pdf_area(&self) -> f32 {
        1.0 / self.area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_front_and_miss() {
        let sphere = Sphere::new(glam::Vec3A::ZERO, 1.0);
        let hit = Ray::new(glam::Vec3A::new(0.0, 0.0, 3.0), -glam::Vec3A::Z);
        let t = sphere.intersect(&hit, f32::MAX).unwrap();
        assert!((t - 2.0).abs() < 1e-5);

        let miss = Ray::new(glam::Vec3A::new(0.0, 2.0, 3.0), -glam::Vec3A::Z);
        assert!(sphere.intersect(&miss, f32::MAX).is_none());
        assert!(!sphere.intersect_test(&miss, f32::MAX));
    }

    #[test]
    fn test_intersect_from_inside() {
        let sphere = Sphere::new(glam::Vec3A::ZERO, 1.0);
        let ray = Ray::new(glam::Vec3A::ZERO, glam::Vec3A::X);
        let t = sphere.intersect(&ray, f32::MAX).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }
}
