use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::{Color, Extent, PixelRect};

use super::surface;
use super::{
    ClearBuffers, FixedState, FrameTarget, GpuFrame, GpuInit, GraphicsContext, GraphicsError,
    RasterState, SurfaceErrorAction, UncapturedErrors,
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// wgpu-backed [`GraphicsContext`].
///
/// Owns the device, queue and swapchain of one window. Fixed and raster state set
/// through the trait are recorded here; stages read them back with
/// [`fixed_state`](Self::fixed_state) / [`raster_state`](Self::raster_state) and apply
/// them to the render passes they open on [`frame_target`](Self::frame_target).
pub struct GpuContext {
    id: u64,

    /// Kept alive for the surface; never read after construction.
    _instance: wgpu::Instance,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    depth_buffer: bool,
    /// `None` without a depth buffer or while the surface has a zero dimension.
    depth_view: Option<wgpu::TextureView>,

    fixed: FixedState,
    raster: RasterState,

    /// Frame acquired by `begin_frame`, submitted by `present`.
    frame: Option<GpuFrame>,

    /// Set from wgpu's device-lost callback.
    device_lost: Arc<AtomicBool>,
    /// Filled by wgpu's uncaptured-error handler.
    errors: UncapturedErrors,
}

impl GpuContext {
    /// Creates a context bound to `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers on the render
    /// thread block on it with `pollster`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            power_preference,
            depth_buffer,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("stereo360 device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let device_lost = Arc::new(AtomicBool::new(false));
        let flag = device_lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            log::error!("gpu device lost ({reason:?}): {message}");
            flag.store(true, Ordering::Release);
        });

        // Without a handler wgpu panics on the first validation error.
        let errors = UncapturedErrors::new();
        let sink = errors.clone();
        device.on_uncaptured_error(Arc::new(move |error: wgpu::Error| {
            log::debug!("uncaptured wgpu error: {error}");
            sink.record(error.to_string());
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }

        let info = adapter.get_info();
        log::info!(
            "gpu context ready: {} ({:?}), format {:?}, {}x{}",
            info.name,
            info.backend,
            format,
            size.width,
            size.height
        );

        let depth_view = depth_buffer
            .then(|| surface::create_depth_view(&device, size))
            .flatten();

        Ok(Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
            depth_buffer,
            depth_view,
            fixed: FixedState::default(),
            raster: RasterState {
                surface: Extent::new(size.width, size.height),
                ..RasterState::default()
            },
            frame: None,
            device_lost,
            errors,
        })
    }

    /// Distinct per created context. Stages compare it to notice a re-created device
    /// and rebuild their GPU resources.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawable size in physical pixels.
    pub fn size(&self) -> Extent {
        Extent::new(self.size.width, self.size.height)
    }

    pub fn fixed_state(&self) -> FixedState {
        self.fixed
    }

    pub fn raster_state(&self) -> RasterState {
        self.raster
    }

    /// Cull mode matching the recorded back-face culling flag, for pipeline creation.
    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        self.fixed.cull_back_faces.then_some(wgpu::Face::Back)
    }

    /// Encoder and attachments of the acquired frame, if one is in flight.
    pub fn frame_target(&mut self) -> Option<FrameTarget<'_>> {
        let depth_view = self.depth_view.as_ref();
        self.frame.as_mut().map(|frame| FrameTarget {
            encoder: &mut frame.encoder,
            color_view: &frame.view,
            depth_view,
        })
    }

    /// Reconfigures the swapchain and depth target after a resize.
    ///
    /// wgpu rejects 0x0 surfaces; in that case only the recorded size changes.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        self.raster.surface = Extent::new(new_size.width, new_size.height);

        if new_size.width == 0 || new_size.height == 0 {
            self.depth_view = None;
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        if self.depth_buffer {
            self.depth_view = surface::create_depth_view(&self.device, new_size);
        }
    }

    /// Acquires the next surface texture and opens the frame encoder.
    pub fn begin_frame(&mut self) -> std::result::Result<(), SurfaceError> {
        if self.frame.is_some() {
            log::warn!("begin_frame called with a frame in flight; presenting it first");
            self.present();
        }

        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("stereo360 frame encoder"),
            });

        self.frame = Some(GpuFrame {
            surface_texture,
            view,
            encoder,
        });
        Ok(())
    }

    /// Submits the recorded commands and presents the frame.
    pub fn present(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}

impl GraphicsContext for GpuContext {
    fn set_clear_color(&mut self, color: Color) {
        self.fixed.clear_color = color;
    }

    fn set_back_face_culling(&mut self, enabled: bool) {
        self.fixed.cull_back_faces = enabled;
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.fixed.depth_test = enabled;
    }

    fn clear(&mut self, buffers: ClearBuffers) {
        if !buffers.color && !buffers.depth {
            return;
        }
        let clear = self.fixed.clear_color;
        let Some(target) = self.frame_target() else {
            log::trace!("clear outside of a frame ignored");
            return;
        };

        let color_load = if buffers.color {
            wgpu::LoadOp::Clear(wgpu::Color {
                r: f64::from(clear.r),
                g: f64::from(clear.g),
                b: f64::from(clear.b),
                a: f64::from(clear.a),
            })
        } else {
            wgpu::LoadOp::Load
        };

        let depth_stencil_attachment = target
            .depth_view
            .filter(|_| buffers.depth)
            .map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });

        // The pass records the loads; dropping it ends the pass.
        let _pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("stereo360 clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn set_viewport(&mut self, rect: PixelRect) {
        self.raster.viewport = Some(rect);
    }

    fn set_scissor(&mut self, rect: Option<PixelRect>) {
        self.raster.scissor = rect;
    }

    /// Device loss wins over validation errors; those stay queued for the next check.
    fn check_error(&mut self) -> std::result::Result<(), GraphicsError> {
        if self.device_lost.swap(false, Ordering::AcqRel) {
            return Err(GraphicsError::ContextLost);
        }
        match self.errors.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
