use crate::bsdf::ScatteringDir;

/// Orthonormal shading frame. `z` in local space is the shading normal,
/// `hemisphere` is the geometric normal used for reflect/transmit tests.
#[derive(Copy, Clone, Debug)]
pub struct Coordinate {
    local_to_world: glam::Mat3A,
    world_to_local: glam::Mat3A,
    hemisphere: glam::Vec3A,
}

impl Coordinate {
    pub fn from_z(z_world: glam::Vec3A, hemisphere: glam::Vec3A) -> Self {
        let sign = if z_world.z >= 0.0 { 1.0 } else { -1.0 };
        let a = -1.0 / (sign + z_world.z);
        let b = z_world.x * z_world.y * a;
        let x_world = glam::Vec3A::new(
            1.0 + sign * z_world.x * z_world.x * a,
            sign * b,
            -sign * z_world.x,
        );
        let y_world = glam::Vec3A::new(b, sign + z_world.y * z_world.y * a, -z_world.y);

        let local_to_world = glam::Mat3A::from_cols(x_world, y_world, z_world);
        let world_to_local = local_to_world.transpose();
        Self {
            local_to_world,
            world_to_local,
            hemisphere,
        }
    }

    pub fn to_local(&self, world: glam::Vec3A) -> glam::Vec3A {
        self.world_to_local * world
    }

    pub fn to_world(&self, local: glam::Vec3A) -> glam::Vec3A {
        self.local_to_world * local
    }

    pub fn in_expected_hemisphere(&self, dir: glam::Vec3A, ty: ScatteringDir) -> bool {
        if ty == ScatteringDir::Reflect {
            dir.dot(self.hemisphere) >= 0.0
        } else {
            dir.dot(self.hemisphere) <= 0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Coordinate;

    #[test]
    fn test_coord_roundtrip() {
        let n = glam::Vec3A::new(0.3, -0.5, 0.8).normalize();
        let coord = Coordinate::from_z(n, n);

        let v = glam::Vec3A::new(0.1, 0.7, -0.2);
        let back = coord.to_world(coord.to_local(v));
        assert!((back - v).length() < 1e-5);

        // the frame maps the normal onto local +z
        let local_n = coord.to_local(n);
        assert!((local_n - glam::Vec3A::Z).length() < 1e-5);
    }
}
