//! Desktop viewer: a procedural panorama rendered side by side for a head-mounted
//! phone viewer.
//!
//! Keys:
//! - `G` toggles between one view and the stereo pair
//! - arrows turn the head
//! - `=` / `-` change the lens distance by 1mm
//! - `Esc` quits

mod projection;
mod stages;

use stereo360_engine::command::{CommandQueue, CommandSender};
use stereo360_engine::core::{RendererConfig, RendererParts, SurfaceRenderer};
use stereo360_engine::device::{GpuContext, GpuInit};
use stereo360_engine::lens::LensParams;
use stereo360_engine::logging::{init_logging, LogDiagnostics, LoggingConfig};
use stereo360_engine::mode::{DisplayMode, DistortionConfig, OverlayRegistry, SharedDisplayMode};
use stereo360_engine::window::{AppControl, Runtime, RuntimeConfig, ViewerApp};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use projection::{HeadPose, HeadProjection};
use stages::{PassthroughDistortion, ReticleStage, SkyStage};

/// Average adult interpupillary distance, in metres.
const IPD_M: f32 = 0.063;
/// Head turn per arrow key press.
const TURN_STEP: f32 = 0.087_266; // 5 degrees

/// Typical phone-in-viewer measurements, in millimetres.
const LENS_DISTANCE_MM: f32 = 62.0;
const VIEW_WIDTH_MM: f32 = 120.0;
const VIEW_HEIGHT_MM: f32 = 68.0;

struct Viewer {
    renderer: SurfaceRenderer<GpuContext>,
    commands: CommandSender,
    display: SharedDisplayMode,
    pose: HeadPose,
    lens_mm: f32,
}

impl Viewer {
    fn turn(&self, d_yaw: f32, d_pitch: f32) {
        let pose = self.pose.clone();
        self.commands.post(move || pose.rotate(d_yaw, d_pitch));
    }

    fn nudge_lens(&mut self, delta_mm: f32) {
        self.lens_mm = (self.lens_mm + delta_mm).max(0.0);
        self.renderer.set_lens_distance(self.lens_mm);
        log::info!("lens distance {}mm", self.lens_mm);
    }
}

impl ViewerApp for Viewer {
    fn renderer(&mut self) -> &mut SurfaceRenderer<GpuContext> {
        &mut self.renderer
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed {
            return AppControl::Continue;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return AppControl::Continue;
        };

        match code {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::KeyG if !event.repeat => {
                let display = self.display.clone();
                self.commands.post(move || {
                    display.toggle();
                });
            }
            KeyCode::ArrowLeft => self.turn(TURN_STEP, 0.0),
            KeyCode::ArrowRight => self.turn(-TURN_STEP, 0.0),
            KeyCode::ArrowUp => self.turn(0.0, TURN_STEP),
            KeyCode::ArrowDown => self.turn(0.0, -TURN_STEP),
            KeyCode::Equal => self.nudge_lens(1.0),
            KeyCode::Minus => self.nudge_lens(-1.0),
            _ => {}
        }
        AppControl::Continue
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let display = SharedDisplayMode::new(DisplayMode::Glass, DistortionConfig::default());
    let pose = HeadPose::default();
    let queue = CommandQueue::new();
    let commands = queue.sender();

    let mut overlays = OverlayRegistry::new();
    overlays.add(Box::new(ReticleStage::new()));

    let parts = RendererParts {
        display: Box::new(display.clone()),
        projection: Box::new(HeadProjection::new(
            pose.clone(),
            display.clone(),
            IPD_M,
            Some(Box::new(SkyStage::new())),
        )),
        overlays: Box::new(overlays),
        distortion: Box::new(PassthroughDistortion::new()),
        commands: Box::new(queue),
        diagnostics: Box::new(LogDiagnostics::new()),
    };
    let config = RendererConfig {
        lens: LensParams {
            distance_mm: LENS_DISTANCE_MM,
            view_width_mm: VIEW_WIDTH_MM,
            view_height_mm: VIEW_HEIGHT_MM,
            ..LensParams::default()
        },
        ..RendererConfig::default()
    };

    let viewer = Viewer {
        renderer: SurfaceRenderer::new(config, parts),
        commands,
        display,
        pose,
        lens_mm: LENS_DISTANCE_MM,
    };

    log::info!("G: toggle stereo, arrows: look around, =/-: lens distance, Esc: quit");

    Runtime::run(
        RuntimeConfig {
            title: "stereo360 viewer".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        viewer,
    )
}
