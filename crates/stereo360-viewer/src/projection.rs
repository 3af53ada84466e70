use std::sync::{Arc, Mutex, PoisonError};

use glam::Quat;
use stereo360_engine::device::GpuContext;
use stereo360_engine::mode::{
    DisplayMode, ProjectionFrame, ProjectionModeProvider, SharedDisplayMode, StaticProjection,
};
use stereo360_engine::stage::{BoxedStage, Director};

/// 89 degrees; pitch stops just short of straight up/down.
const PITCH_LIMIT: f32 = 1.553_343;

/// Head yaw/pitch in radians, shared with input handling.
#[derive(Debug, Clone, Default)]
pub struct HeadPose(Arc<Mutex<YawPitch>>);

#[derive(Debug, Copy, Clone, Default, PartialEq)]
struct YawPitch {
    yaw: f32,
    pitch: f32,
}

impl HeadPose {
    pub fn rotate(&self, d_yaw: f32, d_pitch: f32) {
        let mut pose = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        pose.yaw = (pose.yaw + d_yaw).rem_euclid(std::f32::consts::TAU);
        pose.pitch = (pose.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn orientation(&self) -> Quat {
        let pose = *self.0.lock().unwrap_or_else(PoisonError::into_inner);
        Quat::from_rotation_y(pose.yaw) * Quat::from_rotation_x(pose.pitch)
    }
}

/// Projection that follows the head pose: one centred director in normal mode, a
/// stereo pair in glass mode.
pub struct HeadProjection {
    pose: HeadPose,
    display: SharedDisplayMode,
    ipd_m: f32,
    inner: StaticProjection<GpuContext>,
}

impl HeadProjection {
    pub fn new(
        pose: HeadPose,
        display: SharedDisplayMode,
        ipd_m: f32,
        main_stage: Option<BoxedStage<GpuContext>>,
    ) -> Self {
        Self {
            pose,
            display,
            ipd_m,
            inner: StaticProjection::new(Vec::new(), main_stage),
        }
    }

    fn refresh_directors(&mut self) {
        let orientation = self.pose.orientation();
        let directors = self.inner.directors_mut();
        directors.clear();
        match self.display.mode() {
            DisplayMode::Normal => directors.push(Director::default().with_orientation(orientation)),
            DisplayMode::Glass => directors.extend(
                Director::stereo_pair(self.ipd_m).map(|d| d.with_orientation(orientation)),
            ),
        }
    }
}

impl ProjectionModeProvider<GpuContext> for HeadProjection {
    fn frame(&mut self) -> ProjectionFrame<'_, GpuContext> {
        self.refresh_directors();
        self.inner.frame()
    }
}
