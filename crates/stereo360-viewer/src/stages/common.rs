//! GPU helpers shared by the viewer stages.

use std::marker::PhantomData;

use bytemuck::Pod;
use stereo360_engine::device::FrameTarget;
use stereo360_engine::stage::StageError;

/// Views a stage can draw per frame; one uniform slot each.
pub(super) const MAX_VIEWS: usize = 8;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── per-view uniforms ─────────────────────────────────────────────────────

/// Uniform buffer with one slot per view, bound with a dynamic offset.
///
/// `queue.write_buffer` calls land before the frame's command buffer runs, so views
/// sharing one slot would all see the last write.
pub(super) struct UniformSlots<T: Pod> {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    stride: u64,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformSlots<T> {
    pub(super) fn new(device: &wgpu::Device, label: &str, visibility: wgpu::ShaderStages) -> Self {
        let size = std::mem::size_of::<T>() as u64;
        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment).max(1);
        let stride = size.div_ceil(align) * align;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * MAX_VIEWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size),
                }),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
            stride,
            _marker: PhantomData,
        }
    }

    pub(super) fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Writes the slot of view `index`; returns its dynamic offset.
    pub(super) fn write(&self, queue: &wgpu::Queue, index: usize, value: &T) -> Result<u32, StageError> {
        if index >= MAX_VIEWS {
            return Err(StageError::other(format!(
                "view {index} exceeds the {MAX_VIEWS} uniform slots"
            )));
        }
        let offset = self.stride * index as u64;
        queue.write_buffer(&self.buffer, offset, bytemuck::bytes_of(value));
        u32::try_from(offset).map_err(|_| StageError::other("uniform offset overflows u32"))
    }
}

// ── passes ────────────────────────────────────────────────────────────────

/// Opens a pass that keeps the frame's current contents.
pub(super) fn load_pass<'a>(target: FrameTarget<'a>, label: &str) -> wgpu::RenderPass<'a> {
    let FrameTarget {
        encoder,
        color_view,
        ..
    } = target;

    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

pub(super) fn no_frame() -> StageError {
    StageError::graphics("no frame in flight")
}
