use std::ops::{BitOr, Deref, DerefMut};

use crate::coords::{Color, PixelRect};

use super::GraphicsError;

/// Buffers cleared by [`GraphicsContext::clear`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ClearBuffers {
    pub color: bool,
    pub depth: bool,
}

impl ClearBuffers {
    pub const COLOR: Self = Self { color: true, depth: false };
    pub const DEPTH: Self = Self { color: false, depth: true };
}

impl BitOr for ClearBuffers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
        }
    }
}

/// Context state installed whenever the graphics context is (re)created.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedState {
    pub clear_color: Color,
    pub cull_back_faces: bool,
    pub depth_test: bool,
}

impl Default for FixedState {
    fn default() -> Self {
        Self {
            clear_color: Color::TRANSPARENT,
            cull_back_faces: true,
            depth_test: false,
        }
    }
}

/// Host-agnostic graphics context used by the renderer and its stages.
///
/// All calls happen on the render thread. Implementations must not block.
pub trait GraphicsContext {
    fn set_clear_color(&mut self, color: Color);

    fn set_back_face_culling(&mut self, enabled: bool);

    fn set_depth_test(&mut self, enabled: bool);

    /// Clears the given buffers of the whole surface.
    fn clear(&mut self, buffers: ClearBuffers);

    /// Sets the region subsequent draws map to.
    fn set_viewport(&mut self, rect: PixelRect);

    /// Restricts draws to `rect`; `None` disables clipping.
    fn set_scissor(&mut self, rect: Option<PixelRect>);

    /// Reports and clears the pending context error, if any.
    fn check_error(&mut self) -> Result<(), GraphicsError> {
        Ok(())
    }

    fn apply_fixed_state(&mut self, state: &FixedState) {
        self.set_clear_color(state.clear_color);
        self.set_back_face_culling(state.cull_back_faces);
        self.set_depth_test(state.depth_test);
    }
}

/// Viewport and scissor bound to one view for as long as the scope lives.
///
/// Dropping the scope disables the scissor so the next view starts unclipped.
#[derive(Debug)]
pub struct ScissorScope<'a, C: GraphicsContext> {
    ctx: &'a mut C,
    rect: PixelRect,
}

impl<'a, C: GraphicsContext> ScissorScope<'a, C> {
    pub fn bind(ctx: &'a mut C, rect: PixelRect) -> Self {
        ctx.set_viewport(rect);
        ctx.set_scissor(Some(rect));
        Self { ctx, rect }
    }

    #[inline]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }
}

impl<C: GraphicsContext> Deref for ScissorScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.ctx
    }
}

impl<C: GraphicsContext> DerefMut for ScissorScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.ctx
    }
}

impl<C: GraphicsContext> Drop for ScissorScope<'_, C> {
    fn drop(&mut self) {
        self.ctx.set_scissor(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GlCall, RecordingContext};

    #[test]
    fn scope_binds_and_releases_scissor() {
        let mut ctx = RecordingContext::default();
        let rect = PixelRect::new(600, 0, 400, 500);
        {
            let scope = ScissorScope::bind(&mut ctx, rect);
            assert_eq!(scope.rect(), rect);
            assert_eq!(scope.scissor(), Some(rect));
        }
        assert_eq!(ctx.scissor(), None);
        assert_eq!(
            ctx.calls(),
            &[
                GlCall::Viewport(rect),
                GlCall::Scissor(Some(rect)),
                GlCall::Scissor(None),
            ]
        );
    }

    #[test]
    fn fixed_state_defaults() {
        let state = FixedState::default();
        assert_eq!(state.clear_color, Color::TRANSPARENT);
        assert!(state.cull_back_faces);
        assert!(!state.depth_test);
    }

    #[test]
    fn clear_buffers_combine() {
        let all = ClearBuffers::COLOR | ClearBuffers::DEPTH;
        assert!(all.color && all.depth);
    }
}
