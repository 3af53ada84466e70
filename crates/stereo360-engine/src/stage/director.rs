use glam::{Mat4, Quat, Vec3};

use crate::coords::Extent;

/// Camera state for one view.
///
/// Supplied by the projection mode; the pipeline hands `directors[i]` to every stage
/// drawing view `i`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Director {
    /// Head orientation (world from eye).
    pub orientation: Quat,
    /// Eye position relative to the head centre, in metres.
    pub eye_offset: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Director {
    fn default() -> Self {
        Self {
            orientation: Quat::IDENTITY,
            eye_offset: Vec3::ZERO,
            fov_y: 90.0_f32.to_radians(),
            near: 0.1,
            far: 500.0,
        }
    }
}

impl Director {
    /// Left and right eye directors separated by `ipd` metres.
    pub fn stereo_pair(ipd: f32) -> [Self; 2] {
        let half = Vec3::new(ipd * 0.5, 0.0, 0.0);
        [
            Self {
                eye_offset: -half,
                ..Self::default()
            },
            Self {
                eye_offset: half,
                ..Self::default()
            },
        ]
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    /// Eye from world.
    pub fn view_matrix(&self) -> Mat4 {
        let world_from_eye = Mat4::from_rotation_translation(self.orientation, self.eye_offset);
        world_from_eye.inverse()
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, viewport: Extent) -> Mat4 {
        self.projection(viewport.aspect()) * self.view_matrix()
    }
}
