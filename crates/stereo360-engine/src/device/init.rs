/// Initialization parameters for [`GpuContext`](super::GpuContext).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// FIFO paces presentation to the display refresh, which keeps head motion smooth
    /// in a viewer.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to a supported mode when the surface rejects it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Phones in a viewer usually want `LowPower`; desktops `HighPerformance`.
    pub power_preference: wgpu::PowerPreference,

    /// Allocate a depth target cleared with the color buffer each frame.
    pub depth_buffer: bool,

    pub required_limits: wgpu::Limits,

    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            depth_buffer: true,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 1,
        }
    }
}
