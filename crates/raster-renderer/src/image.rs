//! Images handed to the host for drawing.

use raster_common::{PixelBuffer, PngCompression, RasterResult, RenderContext, ScreenRect};
use std::sync::Arc;

use crate::png;

/// A rasterized buffer plus where and how to draw it.
///
/// The buffer is shared with the producing rasterizer's cache and is
/// read-only from here on.
#[derive(Debug, Clone)]
pub struct RasterImage {
    buffer: Arc<PixelBuffer>,
    dest: ScreenRect,
    opacity: f64,
    smooth: bool,
}

impl RasterImage {
    pub fn new(buffer: Arc<PixelBuffer>, dest: ScreenRect, opacity: f64, smooth: bool) -> Self {
        Self {
            buffer,
            dest,
            opacity,
            smooth,
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn dest(&self) -> ScreenRect {
        self.dest
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn smooth(&self) -> bool {
        self.smooth
    }

    pub fn draw(&self, ctx: &mut dyn RenderContext) {
        ctx.draw_image(&self.buffer, self.dest, self.opacity, self.smooth);
    }

    /// Encode the pixels as PNG for transport.
    pub fn to_png(&self, compression: PngCompression) -> RasterResult<Vec<u8>> {
        png::encode_buffer(&self.buffer, compression)
    }
}
