use bytemuck::{Pod, Zeroable};
use stereo360_engine::coords::Extent;
use stereo360_engine::device::GpuContext;
use stereo360_engine::stage::{Director, Stage, StageError};

use super::common::{load_pass, no_frame, UniformSlots};

/// Procedural panorama drawn as a fullscreen triangle.
///
/// Each pixel is turned back into a world ray with the inverse view-projection of its
/// view, then shaded as sky above the horizon and ground below, with a
/// latitude/longitude grid on top.
pub struct SkyStage {
    grid_divisions: f32,
    surface: Extent,
    gpu: Option<SkyResources>,
}

struct SkyResources {
    context_id: u64,
    format: wgpu::TextureFormat,
    cull_mode: Option<wgpu::Face>,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformSlots<SkyUniform>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SkyUniform {
    inv_view_proj: [[f32; 4]; 4],
    /// x: grid lines per half turn
    params: [f32; 4],
}

impl SkyStage {
    pub fn new() -> Self {
        Self {
            grid_divisions: 12.0,
            surface: Extent::ZERO,
            gpu: None,
        }
    }

    fn is_current(&self, ctx: &GpuContext) -> bool {
        self.gpu.as_ref().is_some_and(|r| {
            r.context_id == ctx.id()
                && r.format == ctx.surface_format()
                && r.cull_mode == ctx.cull_mode()
        })
    }

    fn build(ctx: &GpuContext) -> SkyResources {
        let device = ctx.device();
        let format = ctx.surface_format();
        let cull_mode = ctx.cull_mode();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stereo360 sky shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/sky.wgsl").into()),
        });

        let uniforms = UniformSlots::new(device, "stereo360 sky uniforms", wgpu::ShaderStages::FRAGMENT);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("stereo360 sky pipeline layout"),
            bind_group_layouts: &[uniforms.layout()],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("stereo360 sky pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("sky pipeline built for context {} ({format:?})", ctx.id());

        SkyResources {
            context_id: ctx.id(),
            format,
            cull_mode,
            pipeline,
            uniforms,
        }
    }
}

impl Default for SkyStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage<GpuContext> for SkyStage {
    fn prepare(&mut self, ctx: &mut GpuContext) -> Result<(), StageError> {
        if !self.is_current(ctx) {
            self.gpu = Some(Self::build(ctx));
        }
        Ok(())
    }

    fn global_update(&mut self, surface: Extent) -> Result<(), StageError> {
        self.surface = surface;
        Ok(())
    }

    fn render_at(
        &mut self,
        ctx: &mut GpuContext,
        index: usize,
        viewport: Extent,
        director: &Director,
    ) -> Result<(), StageError> {
        let Some(res) = self.gpu.as_ref() else {
            return Err(StageError::other("sky stage used before prepare"));
        };

        let uniform = SkyUniform {
            inv_view_proj: director.view_projection(viewport).inverse().to_cols_array_2d(),
            params: [self.grid_divisions, 0.0, 0.0, 0.0],
        };
        let offset = res.uniforms.write(ctx.queue(), index, &uniform)?;

        let raster = ctx.raster_state();
        let target = ctx.frame_target().ok_or_else(no_frame)?;
        let mut pass = load_pass(target, "stereo360 sky pass");
        if !raster.apply(&mut pass) {
            return Ok(());
        }

        pass.set_pipeline(&res.pipeline);
        pass.set_bind_group(0, res.uniforms.bind_group(), &[offset]);
        pass.draw(0..3, 0..1);
        Ok(())
    }

    fn label(&self) -> &str {
        "sky"
    }
}
