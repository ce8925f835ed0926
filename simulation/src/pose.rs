use cgmath::{Matrix4, One, Point3, Quaternion, Vector3};

/// World transform of the moving platform for one tick.
///
/// The platform's local frame has the clock axis along +Y (bottom mirror at
/// `y = 0`, top mirror at `y = L`) and its direction of travel along +X, so
/// contraction only ever touches `scale.x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformPose {
    pub position: Point3<f32>,
    pub orientation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for PlatformPose {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 0.0),
            orientation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl PlatformPose {
    /// Maps a point in the platform's local frame to world space.
    pub fn transform_point(&self, local: Point3<f32>) -> Point3<f32> {
        let scaled = Vector3::new(
            local.x * self.scale.x,
            local.y * self.scale.y,
            local.z * self.scale.z,
        );
        self.position + self.orientation * scaled
    }

    /// Unit vector along the platform's direction of travel.
    pub fn forward(&self) -> Vector3<f32> {
        self.orientation * Vector3::unit_x()
    }

    /// Unit vector along the clock axis.
    pub fn up(&self) -> Vector3<f32> {
        self.orientation * Vector3::unit_y()
    }

    /// World position of a photon at `phase` on a clock of length `arm_length`.
    pub fn photon_position(&self, phase: f32, arm_length: f32) -> Point3<f32> {
        self.transform_point(Point3::new(0.0, phase * arm_length, 0.0))
    }

    /// Translation · rotation · scale, for the renderer.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(
            self.position.x,
            self.position.y,
            self.position.z,
        )) * Matrix4::from(self.orientation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Kinds of background body a scenario can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Earth,
    Star,
    Planet,
    GalacticCore,
}

/// A celestial body placed in the world for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPlacement {
    pub kind: BodyKind,
    pub position: Point3<f32>,
    pub radius: f32,
}

/// Everything a motion policy produces for one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenePose {
    pub platform: PlatformPose,
    pub bodies: Vec<BodyPlacement>,
}

impl ScenePose {
    pub fn body(&self, kind: BodyKind) -> Option<&BodyPlacement> {
        self.bodies.iter().find(|b| b.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Rad, Rotation3};

    #[test]
    fn test_identity_pose_places_photon_on_axis() {
        let pose = PlatformPose::default();
        let p = pose.photon_position(0.25, 2.0);
        assert_eq!(p, Point3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_contraction_leaves_clock_axis_alone() {
        let pose = PlatformPose {
            scale: Vector3::new(0.2, 1.0, 1.0),
            ..Default::default()
        };
        let top = pose.photon_position(1.0, 2.0);
        assert!((top.y - 2.0).abs() < 1e-6);
        let edge = pose.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert!((edge.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_pose() {
        let pose = PlatformPose {
            position: Point3::new(5.0, 0.0, 0.0),
            orientation: Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        };
        let forward = pose.forward();
        assert!((forward - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-6);
        assert!((pose.up() - Vector3::unit_y()).magnitude() < 1e-6);
    }

    #[test]
    fn test_matrix_matches_point_transform() {
        let pose = PlatformPose {
            position: Point3::new(1.0, 2.0, 3.0),
            orientation: Quaternion::from_angle_y(Rad(0.7)),
            scale: Vector3::new(0.5, 1.0, 1.0),
        };
        let local = Point3::new(1.0, 1.0, -1.0);
        let via_matrix = pose.to_matrix() * local.to_homogeneous();
        let direct = pose.transform_point(local);
        assert!((via_matrix.x - direct.x).abs() < 1e-5);
        assert!((via_matrix.y - direct.y).abs() < 1e-5);
        assert!((via_matrix.z - direct.z).abs() < 1e-5);
    }
}
