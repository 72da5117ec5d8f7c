//! Frame acquisition and submission.
//!
//! [`FrameContext::begin`] takes the next swapchain texture and opens a
//! command encoder; the renderer records its passes into it, then
//! [`FrameContext::finish`] submits and presents.

use super::GpuContext;

/// Background color for the color attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f64; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.0, 0.0, 0.0, 1.0])
    }
}

impl From<ClearColor> for wgpu::Color {
    fn from(color: ClearColor) -> Self {
        let [r, g, b, a] = color.0;
        wgpu::Color { r, g, b, a }
    }
}

/// One frame in flight: the acquired surface texture and its encoder.
pub(crate) struct FrameContext {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    output: wgpu::SurfaceTexture,
}

impl FrameContext {
    pub fn begin(gpu: &GpuContext) -> Result<Self, wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("vitrine frame encoder"),
        });
        Ok(Self { encoder, view, output })
    }

    pub fn finish(self, gpu: &GpuContext) {
        gpu.queue.submit(std::iter::once(self.encoder.finish()));
        self.output.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_converts_channel_for_channel() {
        let color: wgpu::Color = ClearColor([0.1, 0.2, 0.3, 1.0]).into();
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 1.0));
        assert_eq!(ClearColor::default().0, [0.0, 0.0, 0.0, 1.0]);
    }
}
