//! Fixture builder for integration tests and benches: a small QR encoder
//! and a renderer that draws symbols into greyscale images with optional
//! perspective warp and noise.

#![allow(dead_code)]

use qrscan::utils::geometry::PerspectiveTransform;
use qrscan::{BitMatrix, Code, ECLevel, Point};

/// Module grid, `grid[y][x]`, dark = true
pub type Grid = Vec<Vec<bool>>;

/// Error correction codewords per block, rows L, M, Q, H, indexed by version
const ECC_PER_BLOCK: [[usize; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

/// Number of blocks, rows L, M, Q, H, indexed by version
const NUM_BLOCKS: [[usize; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

const ALNUM: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// One segment of a symbol's data stream
#[derive(Debug, Clone)]
pub enum Segment {
    /// Decimal digits
    Numeric(String),
    /// Characters from the 45-symbol alphanumeric set
    Alphanumeric(String),
    /// Raw bytes
    Byte(Vec<u8>),
    /// Shift-JIS double-byte codes
    Kanji(Vec<u16>),
    /// ECI designator
    Eci(u32),
    /// Arbitrary `(value, bits)` pairs
    Raw(Vec<(u32, usize)>),
}

fn level_row(level: ECLevel) -> usize {
    match level {
        ECLevel::L => 0,
        ECLevel::M => 1,
        ECLevel::Q => 2,
        ECLevel::H => 3,
    }
}

struct GaloisTables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn gf() -> GaloisTables {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut x: u32 = 1;
    for i in 0..255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= 0x11d;
        }
    }
    for i in 255..512 {
        exp[i] = exp[i - 255];
    }
    GaloisTables { exp, log }
}

impl GaloisTables {
    fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            0
        } else {
            self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
        }
    }
}

/// Reed-Solomon check bytes for `data`, generator roots alpha^0..alpha^(n-1)
pub fn rs_check_bytes(data: &[u8], n: usize) -> Vec<u8> {
    let gf = gf();
    let mut generator = vec![1u8];
    for i in 0..n {
        let root = gf.exp[i];
        let mut next = vec![0u8; generator.len() + 1];
        for (j, &c) in generator.iter().enumerate() {
            next[j] ^= c;
            next[j + 1] ^= gf.mul(c, root);
        }
        generator = next;
    }

    let mut rem: Vec<u8> = data.iter().copied().chain(std::iter::repeat_n(0, n)).collect();
    for i in 0..data.len() {
        let factor = rem[i];
        if factor != 0 {
            for j in 1..=n {
                rem[i + j] ^= gf.mul(generator[j], factor);
            }
        }
    }
    rem.split_off(data.len())
}

pub fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut r = (16 * v + 128) * v + 64;
    if v >= 2 {
        let n = v / 7 + 2;
        r -= (25 * n - 10) * n - 55;
        if v >= 7 {
            r -= 36;
        }
    }
    r
}

pub fn alignment_positions(version: u8) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let v = version as usize;
    let n = v / 7 + 2;
    let step = if v == 32 {
        26
    } else {
        (v * 4 + n * 2 + 1) / (2 * n - 2) * 2
    };
    let mut res = vec![6; n];
    let mut pos = v * 4 + 10;
    for i in (1..n).rev() {
        res[i] = pos;
        pos -= step;
    }
    res
}

fn char_count_bits(mode: u32, version: u8) -> usize {
    let widths = match mode {
        1 => [10, 12, 14],
        2 => [9, 11, 13],
        4 => [8, 16, 16],
        _ => [8, 10, 12],
    };
    match version {
        0..=9 => widths[0],
        10..=26 => widths[1],
        _ => widths[2],
    }
}

#[derive(Default)]
struct Bits(Vec<bool>);

impl Bits {
    fn put(&mut self, value: u32, n: usize) {
        for i in (0..n).rev() {
            self.0.push((value >> i) & 1 == 1);
        }
    }
}

fn alnum_index(c: u8) -> u32 {
    ALNUM.iter().position(|&a| a == c).expect("alphanumeric character") as u32
}

fn segment_bits(bits: &mut Bits, segment: &Segment, version: u8) {
    match segment {
        Segment::Numeric(digits) => {
            bits.put(1, 4);
            bits.put(digits.len() as u32, char_count_bits(1, version));
            for chunk in digits.as_bytes().chunks(3) {
                let value: u32 = std::str::from_utf8(chunk).unwrap().parse().unwrap();
                bits.put(value, [0, 4, 7, 10][chunk.len()]);
            }
        }
        Segment::Alphanumeric(text) => {
            bits.put(2, 4);
            bits.put(text.len() as u32, char_count_bits(2, version));
            for pair in text.as_bytes().chunks(2) {
                match pair {
                    [a, b] => bits.put(alnum_index(*a) * 45 + alnum_index(*b), 11),
                    [a] => bits.put(alnum_index(*a), 6),
                    _ => unreachable!(),
                }
            }
        }
        Segment::Byte(data) => {
            bits.put(4, 4);
            bits.put(data.len() as u32, char_count_bits(4, version));
            for &b in data {
                bits.put(b as u32, 8);
            }
        }
        Segment::Kanji(codes) => {
            bits.put(8, 4);
            bits.put(codes.len() as u32, char_count_bits(8, version));
            for &c in codes {
                let c = c as u32 - if c <= 0x9ffc { 0x8140 } else { 0xc140 };
                bits.put((c >> 8) * 0xc0 + (c & 0xff), 13);
            }
        }
        Segment::Eci(value) => {
            bits.put(7, 4);
            if *value < 128 {
                bits.put(*value, 8);
            } else if *value < 16384 {
                bits.put(0x8000 | value, 16);
            } else {
                bits.put(0xc0_0000 | value, 24);
            }
        }
        Segment::Raw(pairs) => {
            for &(value, n) in pairs {
                bits.put(value, n);
            }
        }
    }
}

/// Data codewords split into blocks, each with its check bytes
pub fn blocks(segments: &[Segment], version: u8, level: ECLevel) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut bits = Bits::default();
    for segment in segments {
        segment_bits(&mut bits, segment, version);
    }

    let total = raw_data_modules(version) / 8;
    let nb = NUM_BLOCKS[level_row(level)][version as usize];
    let ecc = ECC_PER_BLOCK[level_row(level)][version as usize];
    let capacity = (total - nb * ecc) * 8;
    assert!(bits.0.len() <= capacity, "segments too long for symbol");

    let terminator = 4.min(capacity - bits.0.len());
    bits.put(0, terminator);
    let pad_bits = (8 - bits.0.len() % 8) % 8;
    bits.put(0, pad_bits);
    let mut pad = 0xec;
    while bits.0.len() < capacity {
        bits.put(pad, 8);
        pad ^= 0xec ^ 0x11;
    }
    let data: Vec<u8> = bits
        .0
        .chunks(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect();

    let num_short = nb - total % nb;
    let short_len = total / nb;
    let mut out = Vec::with_capacity(nb);
    let mut k = 0;
    for i in 0..nb {
        let len = short_len - ecc + usize::from(i >= num_short);
        let block = data[k..k + len].to_vec();
        k += len;
        let check = rs_check_bytes(&block, ecc);
        out.push((block, check));
    }
    out
}

/// Interleave blocks into the final codeword sequence
pub fn interleave(blocks: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let max_data = blocks.iter().map(|b| b.0.len()).max().unwrap_or(0);
    let ecc = blocks.first().map_or(0, |b| b.1.len());
    let mut out = Vec::new();
    for i in 0..max_data {
        for (data, _) in blocks {
            if let Some(&b) = data.get(i) {
                out.push(b);
            }
        }
    }
    for i in 0..ecc {
        for (_, check) in blocks {
            out.push(check[i]);
        }
    }
    out
}

/// Final codeword sequence for the given segments
pub fn codewords(segments: &[Segment], version: u8, level: ECLevel) -> Vec<u8> {
    interleave(&blocks(segments, version, level))
}

fn mask_applies(mask: u8, x: usize, y: usize) -> bool {
    let (i, j) = (y, x);
    match mask {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        _ => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
    }
}

/// Masked 15-bit format word
pub fn format_word(level: ECLevel, mask: u8) -> u16 {
    let data = ((level.format_bits() as u32) << 3) | mask as u32;
    let mut r = data;
    for _ in 0..10 {
        r = (r << 1) ^ ((r >> 9) * 0x537);
    }
    (((data << 10) | r) ^ 0x5412) as u16
}

/// 18-bit version word
pub fn version_word(version: u8) -> u32 {
    let mut r = version as u32;
    for _ in 0..12 {
        r = (r << 1) ^ ((r >> 11) * 0x1f25);
    }
    ((version as u32) << 12) | r
}

/// Lay codewords into a module grid with an explicit format word
pub fn place_with_format(codewords: &[u8], version: u8, mask: u8, format: u16) -> Grid {
    let n = version as usize * 4 + 17;
    let mut grid = vec![vec![false; n]; n];
    let mut function = vec![vec![false; n]; n];
    let mut set = |x: usize, y: usize, dark: bool| {
        grid[y][x] = dark;
        function[y][x] = true;
    };

    for i in 0..n {
        set(6, i, i % 2 == 0);
        set(i, 6, i % 2 == 0);
    }
    for (cx, cy) in [(3i32, 3i32), (n as i32 - 4, 3), (3, n as i32 - 4)] {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 && (x as usize) < n && (y as usize) < n {
                    let d = dx.abs().max(dy.abs());
                    set(x as usize, y as usize, d != 2 && d != 4);
                }
            }
        }
    }
    let ap = alignment_positions(version);
    let last = ap.len().saturating_sub(1);
    for (i, &a) in ap.iter().enumerate() {
        for (j, &b) in ap.iter().enumerate() {
            if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                continue;
            }
            for dy in -2i32..=2 {
                for dx in -2i32..=2 {
                    let d = dx.abs().max(dy.abs());
                    set((a as i32 + dx) as usize, (b as i32 + dy) as usize, d != 1);
                }
            }
        }
    }

    let f = format as u32;
    let bit = |i: usize| (f >> i) & 1 == 1;
    for i in 0..6 {
        set(8, i, bit(i));
    }
    set(8, 7, bit(6));
    set(8, 8, bit(7));
    set(7, 8, bit(8));
    for i in 9..15 {
        set(14 - i, 8, bit(i));
    }
    for i in 0..8 {
        set(n - 1 - i, 8, bit(i));
    }
    for i in 8..15 {
        set(8, n - 15 + i, bit(i));
    }
    set(8, n - 8, true);

    if version >= 7 {
        let vw = version_word(version);
        for i in 0..18 {
            let dark = (vw >> i) & 1 == 1;
            let a = n - 11 + i % 3;
            let b = i / 3;
            set(a, b, dark);
            set(b, a, dark);
        }
    }

    let bits: Vec<bool> = codewords
        .iter()
        .flat_map(|&c| (0..8).rev().map(move |i| (c >> i) & 1 == 1))
        .collect();
    let mut k = 0;
    let mut right = n as i32 - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        for vert in 0..n {
            for j in 0..2 {
                let x = (right - j) as usize;
                let upward = ((right + 1) & 2) == 0;
                let y = if upward { n - 1 - vert } else { vert };
                if !function[y][x] && k < bits.len() {
                    grid[y][x] = bits[k];
                    k += 1;
                }
            }
        }
        right -= 2;
    }

    for y in 0..n {
        for x in 0..n {
            if !function[y][x] && mask_applies(mask, x, y) {
                grid[y][x] = !grid[y][x];
            }
        }
    }
    grid
}

/// Lay codewords into a module grid
pub fn place(codewords: &[u8], version: u8, level: ECLevel, mask: u8) -> Grid {
    place_with_format(codewords, version, mask, format_word(level, mask))
}

/// Encode segments into a complete module grid
pub fn encode(segments: &[Segment], version: u8, level: ECLevel, mask: u8) -> Grid {
    place(&codewords(segments, version, level), version, level, mask)
}

/// A grid as a located code, bypassing detection
pub fn to_code(grid: &Grid) -> Code {
    let n = grid.len();
    let mut cells = BitMatrix::square(n);
    for (y, row) in grid.iter().enumerate() {
        for (x, &dark) in row.iter().enumerate() {
            cells.set(x, y, dark);
        }
    }
    Code::new([Point::new(0, 0); 4], cells)
}

pub const LIGHT: u8 = 220;
pub const DARK: u8 = 30;

/// Image-space corners of a square of side `2 * half` centered on `(cx, cy)`,
/// rotated by `angle` radians
pub fn rotated_square(cx: f64, cy: f64, half: f64, angle: f64) -> [(f64, f64); 4] {
    let (s, c) = angle.sin_cos();
    [(-half, -half), (half, -half), (half, half), (-half, half)]
        .map(|(x, y)| (cx + x * c - y * s, cy + x * s + y * c))
}

/// Render grids into a `width x height` image.
///
/// Each placement maps the module square corners `(0,0) (n,0) (n,n) (0,n)`
/// onto the given image corners. Pixels are sampled at their centers.
/// `noise` adds deterministic uniform noise of that amplitude.
pub fn render(
    width: usize,
    height: usize,
    placements: &[(&Grid, [(f64, f64); 4])],
    noise: i32,
    seed: u64,
) -> Vec<u8> {
    let mut img = vec![LIGHT; width * height];
    for (grid, corners) in placements {
        let n = grid.len() as f64;
        let to_module =
            PerspectiveTransform::from_points(corners, &[(0.0, 0.0), (n, 0.0), (n, n), (0.0, n)])
                .expect("non-degenerate placement");

        let min_x = corners.iter().map(|p| p.0).fold(f64::MAX, f64::min);
        let max_x = corners.iter().map(|p| p.0).fold(f64::MIN, f64::max);
        let min_y = corners.iter().map(|p| p.1).fold(f64::MAX, f64::min);
        let max_y = corners.iter().map(|p| p.1).fold(f64::MIN, f64::max);
        let y0 = (min_y as i64 - 1).max(0) as usize;
        let y1 = ((max_y as i64 + 2).max(0) as usize).min(height);
        let x0 = (min_x as i64 - 1).max(0) as usize;
        let x1 = ((max_x as i64 + 2).max(0) as usize).min(width);

        for y in y0..y1 {
            for x in x0..x1 {
                let (u, v) = to_module.map_f64(x as f64 + 0.5, y as f64 + 0.5);
                if (0.0..n).contains(&u) && (0.0..n).contains(&v) && grid[v as usize][u as usize] {
                    img[y * width + x] = DARK;
                }
            }
        }
    }

    if noise > 0 {
        let mut s = seed;
        for px in img.iter_mut() {
            s = (s * 1103515245 + 12345) & 0x7fff_ffff;
            let delta = ((s >> 16) % (2 * noise as u64 + 1)) as i32 - noise;
            *px = (*px as i32 + delta).clamp(0, 255) as u8;
        }
    }
    img
}

/// Render one grid axis-aligned at `scale` pixels per module with a quiet
/// zone of `quiet` modules, optionally displacing each corner by `warp`
pub fn render_scaled(
    grid: &Grid,
    scale: usize,
    quiet: usize,
    warp: Option<[(f64, f64); 4]>,
    noise: i32,
) -> (Vec<u8>, usize) {
    let n = grid.len();
    let side = (n + 2 * quiet) * scale;
    let q0 = (quiet * scale) as f64;
    let q1 = q0 + (n * scale) as f64;
    let mut corners = [(q0, q0), (q1, q0), (q1, q1), (q0, q1)];
    if let Some(warp) = warp {
        for (c, (dx, dy)) in corners.iter_mut().zip(warp) {
            c.0 += dx;
            c.1 += dy;
        }
    }
    (render(side, side, &[(grid, corners)], noise, 1), side)
}
