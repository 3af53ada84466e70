use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::SurfaceRenderer;
use crate::device::{GpuContext, GpuInit, SurfaceErrorAction};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "stereo360".to_string(),
            initial_size: LogicalSize::new(1600.0, 800.0),
        }
    }
}

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`Runtime`].
pub trait ViewerApp {
    /// The renderer the runtime feeds surface transitions to.
    fn renderer(&mut self) -> &mut SurfaceRenderer<GpuContext>;

    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: ViewerApp + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// Window plus the context rendering into it.
///
/// The window outlives context re-creation; the context is dropped on suspend.
struct SurfaceEntry {
    window: Arc<Window>,
    gpu: Option<GpuContext>,
}

struct AppState<A: ViewerApp> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    surface: Option<SurfaceEntry>,
    exit_requested: bool,
}

impl<A: ViewerApp> AppState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            surface: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        Ok(Arc::new(window))
    }

    /// Creates a context for the current window and runs the created and resized
    /// transitions.
    fn create_context(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = match &self.surface {
            Some(entry) => entry.window.clone(),
            None => self.create_window(event_loop)?,
        };

        let mut gpu = pollster::block_on(GpuContext::new(window.clone(), self.gpu_init.clone()))
            .context("GPU initialization failed for window")?;

        let renderer = self.app.renderer();
        renderer.on_surface_created(&mut gpu);
        let size = gpu.size();
        renderer.on_surface_changed(size.width, size.height);

        window.request_redraw();
        self.surface = Some(SurfaceEntry {
            window,
            gpu: Some(gpu),
        });
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.surface.as_mut() else {
            return;
        };
        let Some(gpu) = entry.gpu.as_mut() else {
            return;
        };
        gpu.resize(new_size);
        self.app
            .renderer()
            .on_surface_changed(new_size.width, new_size.height);
        entry.window.request_redraw();
    }

    /// Drives one frame. Returns `false` if the context was lost.
    fn draw(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let Some(entry) = self.surface.as_mut() else {
            return true;
        };
        let Some(gpu) = entry.gpu.as_mut() else {
            return true;
        };

        if let Err(err) = gpu.begin_frame() {
            match gpu.handle_surface_error(err) {
                SurfaceErrorAction::Fatal => {
                    log::error!("surface error is fatal; exiting");
                    self.request_exit(event_loop);
                }
                action => log::debug!("frame skipped: {action:?}"),
            }
            return true;
        }

        let result = self.app.renderer().on_draw_frame(gpu);
        entry.window.pre_present_notify();
        gpu.present();

        match result {
            Ok(report) => {
                log::trace!(
                    "frame: {} view(s), {} skipped, {} failure(s)",
                    report.rendered_views,
                    report.skipped_views,
                    report.failures
                );
                true
            }
            Err(lost) => {
                log::warn!("{lost}");
                false
            }
        }
    }

    fn rebuild_context(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.surface.as_mut() {
            entry.gpu = None;
        }
        if let Err(e) = self.create_context(event_loop) {
            log::error!("failed to re-create graphics context: {e:#}");
            self.request_exit(event_loop);
        }
    }
}

impl<A: ViewerApp> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.as_ref().is_some_and(|e| e.gpu.is_some()) {
            return;
        }

        if let Err(e) = self.create_context(event_loop) {
            log::error!("failed to create graphics context: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.surface.as_mut() {
            if entry.gpu.take().is_some() {
                log::info!("suspended; graphics context released");
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: head-mounted viewing never idles.
        if let Some(entry) = &self.surface {
            entry.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self
            .surface
            .as_ref()
            .is_none_or(|entry| entry.window.id() != window_id)
        {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.surface = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.surface.as_ref().map(|e| e.window.inner_size()) {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.draw(event_loop) {
                    self.rebuild_context(event_loop);
                }
            }

            _ => {}
        }
    }
}
