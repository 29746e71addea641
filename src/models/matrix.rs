/// Packed bit matrix, row-major.
///
/// Bit `i = y * width + x` lives at `bytes[i >> 3] & (1 << (i & 7))`, which
/// is also the layout exported for a code's cell bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new bit matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Create a square matrix, as used for module grids
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Wrap an existing packed buffer. Returns `None` when the buffer is too short.
    pub fn from_bytes(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        let bytes_needed = (width * height).div_ceil(8);
        if bytes.len() < bytes_needed {
            return None;
        }
        let mut data = bytes[..bytes_needed].to_vec();
        let tail = (width * height) % 8;
        if tail != 0 {
            // Keep bits past the end cleared so equality stays meaningful
            if let Some(last) = data.last_mut() {
                *last &= (1u8 << tail) - 1;
            }
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y)
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index >> 3] >> (index & 7)) & 1 == 1
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        if value {
            self.data[index >> 3] |= 1 << (index & 7);
        } else {
            self.data[index >> 3] &= !(1 << (index & 7));
        }
    }

    /// Toggle bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index >> 3] ^= 1 << (index & 7);
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Mirror across the main diagonal
    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(y, x, true);
                }
            }
        }
        out
    }

    /// Get raw data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
