use crate::core::{coord::Coordinate, material::Material};

/// Immutable record of a ray/surface intersection. Built once by the
/// intersector, then read by every stage of a vertex's lighting
/// computation.
#[derive(Copy, Clone)]
pub struct ShadingPoint<'a> {
    pub position: glam::Vec3A,
    pub geometric_normal: glam::Vec3A,
    pub shading_normal: glam::Vec3A,
    pub basis: Coordinate,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Unit direction from the hit point back toward the ray origin.
    pub outgoing: glam::Vec3A,
    pub material: &'a Material,
    /// Index of the primitive that was hit, used to evaluate light
    /// sampling densities for emissive geometry.
    pub primitive: usize,
}
