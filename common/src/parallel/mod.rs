//! Row-parallel processing utilities.

use rayon::prelude::*;


/// Chunks per rayon thread.
const CHUNKS_PER_THREAD: usize = 3;

/// Number of rows per chunk for the given row count.
#[inline]
fn auto_chunk_rows(height: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (height / num_chunks).max(1)
}

/// Extension trait for row-aligned mutable parallel chunks with automatic sizing.
pub trait ParRowsMutAuto<T: Send> {
    /// Split into mutable parallel chunks aligned to row boundaries.
    /// Yields `(chunk_start_row, chunk)` pairs where chunk contains complete rows.
    fn par_rows_mut_auto<'a>(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>
    where
        T: 'a;
}

impl<T: Send> ParRowsMutAuto<T> for [T] {
    fn par_rows_mut_auto<'a>(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>
    where
        T: 'a,
    {
        assert!(width > 0, "row width must be positive");
        debug_assert_eq!(self.len() % width, 0, "slice is not row-aligned");

        let chunk_rows = auto_chunk_rows(self.len() / width);
        self.par_chunks_mut(width * chunk_rows)
            .enumerate()
            .map(move |(idx, chunk)| (idx * chunk_rows, chunk))
    }
}

/// Fills a row-major grid in parallel, calling `f(x, y)` once per cell.
pub fn par_fill_rows<T, F>(data: &mut [T], width: usize, f: F)
where
    T: Send,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    if data.is_empty() {
        return;
    }

    data.par_rows_mut_auto(width)
        .for_each(|(chunk_start_row, chunk)| {
            for (local_y, row) in chunk.chunks_mut(width).enumerate() {
                let y = chunk_start_row + local_y;
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = f(x, y);
                }
            }
        });
}
