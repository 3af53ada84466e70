use crate::coords::{Extent, PixelRect};

/// A single acquired surface frame.
///
/// This object is short-lived. Holding the surface texture prevents acquisition of
/// subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Encoder and attachments of the frame being drawn.
pub struct FrameTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

/// Viewport and scissor recorded through [`GraphicsContext`](super::GraphicsContext).
///
/// Rectangles use a lower-left origin; [`apply`](Self::apply) converts them to wgpu's
/// top-left framebuffer coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RasterState {
    pub surface: Extent,
    pub viewport: Option<PixelRect>,
    pub scissor: Option<PixelRect>,
}

impl RasterState {
    /// Applies viewport and scissor to `pass`.
    ///
    /// Returns `false` when nothing can be drawn (empty viewport or scissor); the pass
    /// is left untouched in that case.
    pub fn apply(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(viewport) = self.viewport.map(|r| self.clamp(r)) else {
            return self.surface.is_configured();
        };
        if viewport.is_empty() {
            return false;
        }

        let scissor = match self.scissor {
            Some(r) => {
                let r = self.clamp(r);
                if r.is_empty() {
                    return false;
                }
                Some(r)
            }
            None => None,
        };

        pass.set_viewport(
            viewport.x as f32,
            self.flip_y(viewport) as f32,
            viewport.width as f32,
            viewport.height as f32,
            0.0,
            1.0,
        );
        if let Some(r) = scissor {
            pass.set_scissor_rect(r.x, self.flip_y(r), r.width, r.height);
        }
        true
    }

    fn clamp(&self, r: PixelRect) -> PixelRect {
        let x = r.x.min(self.surface.width);
        let y = r.y.min(self.surface.height);
        let width = r.width.min(self.surface.width - x);
        let height = r.height.min(self.surface.height - y);
        PixelRect::new(x, y, width, height)
    }

    fn flip_y(&self, r: PixelRect) -> u32 {
        self.surface.height.saturating_sub(r.y.saturating_add(r.height))
    }
}
