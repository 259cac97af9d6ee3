//! Row-parallel pixel filling.
//!
//! Each row is written by exactly one closure call, so the parallel and
//! sequential paths produce identical buffers.

use raster_common::PixelBuffer;
use rayon::prelude::*;

/// Fill every row of `buffer` with `f(row_index, row_bytes)`.
///
/// With `parallel` set the rows are distributed over the rayon pool; the
/// call returns once all rows are written.
pub fn fill_rows<F>(buffer: &mut PixelBuffer, parallel: bool, f: F)
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    let stride = buffer.width() * 4;
    if stride == 0 || buffer.height() == 0 {
        return;
    }

    if parallel {
        buffer
            .as_bytes_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(row, bytes)| f(row, bytes));
    } else {
        for (row, bytes) in buffer.rows_mut().enumerate() {
            f(row, bytes);
        }
    }
}
