//! Scratch buffers reused across `identify` calls.
//!
//! The thresholder needs one row of running sums and the flood fill needs a
//! work-list of seeds. Both are sized by the image, so they are kept here and
//! only ever grow.

/// Pending flood fill seed `(x, y)`
pub type FloodSeed = (usize, usize);

/// Reusable scratch storage owned by a recognizer
#[derive(Debug, Default)]
pub struct BufferPool {
    row_average: Vec<i64>,
    flood_stack: Vec<FloodSeed>,
    peak_flood_depth: usize,
}

impl BufferPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Row sum buffer for the thresholder
    pub fn row_average(&mut self) -> &mut Vec<i64> {
        &mut self.row_average
    }

    /// Take the flood fill work-list, emptied. Hand it back with [`Self::return_flood_stack`].
    pub fn take_flood_stack(&mut self) -> Vec<FloodSeed> {
        let mut stack = std::mem::take(&mut self.flood_stack);
        stack.clear();
        stack
    }

    /// Return the work-list so its allocation is reused
    pub fn return_flood_stack(&mut self, stack: Vec<FloodSeed>) {
        self.peak_flood_depth = self.peak_flood_depth.max(stack.capacity());
        if stack.capacity() >= self.flood_stack.capacity() {
            self.flood_stack = stack;
        }
    }

    /// Largest work-list capacity seen so far
    pub fn peak_flood_depth(&self) -> usize {
        self.peak_flood_depth
    }

    /// Bytes currently reserved by the pool
    pub fn reserved_bytes(&self) -> usize {
        self.row_average.capacity() * std::mem::size_of::<i64>()
            + self.flood_stack.capacity() * std::mem::size_of::<FloodSeed>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flood_stack_reused() {
        let mut pool = BufferPool::new();
        let mut stack = pool.take_flood_stack();
        stack.extend((0..100).map(|i| (i, i)));
        let cap = stack.capacity();
        pool.return_flood_stack(stack);

        let stack = pool.take_flood_stack();
        assert!(stack.is_empty());
        assert_eq!(stack.capacity(), cap);
        assert!(pool.peak_flood_depth() >= 100);
    }

    #[test]
    fn test_reserved_bytes_grow() {
        let mut pool = BufferPool::new();
        assert_eq!(pool.reserved_bytes(), 0);
        pool.row_average().resize(640, 0);
        assert!(pool.reserved_bytes() >= 640 * 8);
    }
}
