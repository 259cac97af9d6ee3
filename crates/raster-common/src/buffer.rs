//! Dense RGBA pixel buffers.
//!
//! Pixels are stored row-major, 4 bytes per pixel, row 0 at the top of the
//! image. Every rasterizer in the workspace uses this one convention.

use crate::color::Color;

/// Owned `width x height` RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 4],
        }
    }

    /// Wrap existing RGBA bytes. Returns `None` if the length does not match.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel index for `(row, col)`, or `None` outside the buffer.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        let i = self.index(row, col)? * 4;
        Some(Color::from_bytes([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]))
    }

    /// Write a pixel. Returns false if `(row, col)` is outside the buffer.
    pub fn set(&mut self, row: usize, col: usize, color: Color) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.data[i * 4..i * 4 + 4].copy_from_slice(&color.to_bytes());
                true
            }
            None => false,
        }
    }

    /// Row-sized mutable slices (`width * 4` bytes each), top to bottom.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut((self.width * 4).max(1))
    }

    /// Raw RGBA bytes (4 bytes per pixel).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copy with the row order reversed.
    pub fn flipped_vertically(&self) -> Self {
        let stride = self.width * 4;
        let mut data = Vec::with_capacity(self.data.len());
        if stride > 0 {
            for row in self.data.chunks_exact(stride).rev() {
                data.extend_from_slice(row);
            }
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Write `color` into one pixel slot of a row slice.
#[inline]
pub fn put_pixel(row: &mut [u8], col: usize, color: Color) {
    row[col * 4..col * 4 + 4].copy_from_slice(&color.to_bytes());
}
