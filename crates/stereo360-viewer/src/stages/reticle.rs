use bytemuck::{Pod, Zeroable};
use stereo360_engine::coords::{Color, Extent};
use stereo360_engine::device::GpuContext;
use stereo360_engine::stage::{Director, Stage, StageError};

use super::common::{load_pass, no_frame, premul_alpha_blend, UniformSlots};

/// Gaze cross drawn at the centre of each view.
pub struct ReticleStage {
    color: Color,
    arm_px: f32,
    thickness_px: f32,
    gpu: Option<ReticleResources>,
}

struct ReticleResources {
    context_id: u64,
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformSlots<ReticleUniform>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ReticleUniform {
    /// Premultiplied RGBA.
    color: [f32; 4],
    /// Half extents in NDC: arm x, arm y, thickness x, thickness y.
    extent: [f32; 4],
}

impl ReticleStage {
    pub fn new() -> Self {
        Self {
            color: Color {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                a: 0.8,
            },
            arm_px: 10.0,
            thickness_px: 1.5,
            gpu: None,
        }
    }

    fn uniform(&self, viewport: Extent) -> ReticleUniform {
        let w = viewport.width.max(1) as f32;
        let h = viewport.height.max(1) as f32;
        let Color { r, g, b, a } = self.color;
        ReticleUniform {
            color: [r * a, g * a, b * a, a],
            extent: [
                2.0 * self.arm_px / w,
                2.0 * self.arm_px / h,
                2.0 * self.thickness_px / w,
                2.0 * self.thickness_px / h,
            ],
        }
    }

    fn build(ctx: &GpuContext) -> ReticleResources {
        let device = ctx.device();
        let format = ctx.surface_format();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stereo360 reticle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/reticle.wgsl").into()),
        });

        let uniforms = UniformSlots::new(
            device,
            "stereo360 reticle uniforms",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("stereo360 reticle pipeline layout"),
            bind_group_layouts: &[uniforms.layout()],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("stereo360 reticle pipeline"),
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
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        ReticleResources {
            context_id: ctx.id(),
            format,
            pipeline,
            uniforms,
        }
    }
}

impl Default for ReticleStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage<GpuContext> for ReticleStage {
    fn prepare(&mut self, ctx: &mut GpuContext) -> Result<(), StageError> {
        let current = self
            .gpu
            .as_ref()
            .is_some_and(|r| r.context_id == ctx.id() && r.format == ctx.surface_format());
        if !current {
            self.gpu = Some(Self::build(ctx));
        }
        Ok(())
    }

    fn global_update(&mut self, _surface: Extent) -> Result<(), StageError> {
        Ok(())
    }

    fn render_at(
        &mut self,
        ctx: &mut GpuContext,
        index: usize,
        viewport: Extent,
        _director: &Director,
    ) -> Result<(), StageError> {
        let uniform = self.uniform(viewport);
        let Some(res) = self.gpu.as_ref() else {
            return Err(StageError::other("reticle stage used before prepare"));
        };
        let offset = res.uniforms.write(ctx.queue(), index, &uniform)?;

        let raster = ctx.raster_state();
        let target = ctx.frame_target().ok_or_else(no_frame)?;
        let mut pass = load_pass(target, "stereo360 reticle pass");
        if !raster.apply(&mut pass) {
            return Ok(());
        }

        pass.set_pipeline(&res.pipeline);
        pass.set_bind_group(0, res.uniforms.bind_group(), &[offset]);
        // Two bars of two triangles each.
        pass.draw(0..12, 0..1);
        Ok(())
    }

    fn label(&self) -> &str {
        "reticle"
    }
}
