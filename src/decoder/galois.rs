//! Galois field arithmetic for the two QR error correcting codes.
//!
//! GF(16) (x^4 + x + 1) carries the BCH format information code and GF(256)
//! (x^8 + x^4 + x^3 + x^2 + 1) the Reed-Solomon data code. Both use log/exp
//! lookup tables; polynomials are stored lowest degree first.

/// A small binary extension field backed by log/exp tables
pub struct GaloisField {
    /// Size of the multiplicative group (15 or 255)
    order: usize,
    log: &'static [u8],
    exp: &'static [u8],
}

static GF16_LOG: [u8; 16] = [0, 0, 1, 4, 2, 8, 5, 10, 3, 14, 9, 7, 6, 13, 11, 12];

static GF16_EXP: [u8; 16] = [1, 2, 4, 8, 3, 6, 12, 11, 5, 10, 7, 14, 15, 13, 9, 1];

static GF256_LOG: [u8; 256] = [
    0, 0, 1, 25, 2, 50, 26, 198, 3, 223, 51, 238, 27, 104, 199, 75, 4, 100, 224, 14, 52, 141, 239,
    129, 28, 193, 105, 248, 200, 8, 76, 113, 5, 138, 101, 47, 225, 36, 15, 33, 53, 147, 142, 218,
    240, 18, 130, 69, 29, 181, 194, 125, 106, 39, 249, 185, 201, 154, 9, 120, 77, 228, 114, 166, 6,
    191, 139, 98, 102, 221, 48, 253, 226, 152, 37, 179, 16, 145, 34, 136, 54, 208, 148, 206, 143,
    150, 219, 189, 241, 210, 19, 92, 131, 56, 70, 64, 30, 66, 182, 163, 195, 72, 126, 110, 107, 58,
    40, 84, 250, 133, 186, 61, 202, 94, 155, 159, 10, 21, 121, 43, 78, 212, 229, 172, 115, 243,
    167, 87, 7, 112, 192, 247, 140, 128, 99, 13, 103, 74, 222, 237, 49, 197, 254, 24, 227, 165,
    153, 119, 38, 184, 180, 124, 17, 68, 146, 217, 35, 32, 137, 46, 55, 63, 209, 91, 149, 188, 207,
    205, 144, 135, 151, 178, 220, 252, 190, 97, 242, 86, 211, 171, 20, 42, 93, 158, 132, 60, 57,
    83, 71, 109, 65, 162, 31, 45, 67, 216, 183, 123, 164, 118, 196, 23, 73, 236, 127, 12, 111, 246,
    108, 161, 59, 82, 41, 157, 85, 170, 251, 96, 134, 177, 187, 204, 62, 90, 203, 89, 95, 176, 156,
    169, 160, 81, 11, 245, 22, 235, 122, 117, 44, 215, 79, 174, 213, 233, 230, 231, 173, 232, 116,
    214, 244, 234, 168, 80, 88, 175,
];

static GF256_EXP: [u8; 256] = [
    1, 2, 4, 8, 16, 32, 64, 128, 29, 58, 116, 232, 205, 135, 19, 38, 76, 152, 45, 90, 180, 117,
    234, 201, 143, 3, 6, 12, 24, 48, 96, 192, 157, 39, 78, 156, 37, 74, 148, 53, 106, 212, 181,
    119, 238, 193, 159, 35, 70, 140, 5, 10, 20, 40, 80, 160, 93, 186, 105, 210, 185, 111, 222, 161,
    95, 190, 97, 194, 153, 47, 94, 188, 101, 202, 137, 15, 30, 60, 120, 240, 253, 231, 211, 187,
    107, 214, 177, 127, 254, 225, 223, 163, 91, 182, 113, 226, 217, 175, 67, 134, 17, 34, 68, 136,
    13, 26, 52, 104, 208, 189, 103, 206, 129, 31, 62, 124, 248, 237, 199, 147, 59, 118, 236, 197,
    151, 51, 102, 204, 133, 23, 46, 92, 184, 109, 218, 169, 79, 158, 33, 66, 132, 21, 42, 84, 168,
    77, 154, 41, 82, 164, 85, 170, 73, 146, 57, 114, 228, 213, 183, 115, 230, 209, 191, 99, 198,
    145, 63, 126, 252, 229, 215, 179, 123, 246, 241, 255, 227, 219, 171, 75, 150, 49, 98, 196, 149,
    55, 110, 220, 165, 87, 174, 65, 130, 25, 50, 100, 200, 141, 7, 14, 28, 56, 112, 224, 221, 167,
    83, 166, 81, 162, 89, 178, 121, 242, 249, 239, 195, 155, 43, 86, 172, 69, 138, 9, 18, 36, 72,
    144, 61, 122, 244, 245, 247, 243, 251, 235, 203, 139, 11, 22, 44, 88, 176, 125, 250, 233, 207,
    131, 27, 54, 108, 216, 173, 71, 142, 1,
];

/// GF(16), generator polynomial 0x13
pub static GF16: GaloisField = GaloisField {
    order: 15,
    log: &GF16_LOG,
    exp: &GF16_EXP,
};

/// GF(256), generator polynomial 0x11d
pub static GF256: GaloisField = GaloisField {
    order: 255,
    log: &GF256_LOG,
    exp: &GF256_EXP,
};

impl GaloisField {
    /// Size of the multiplicative group
    pub fn order(&self) -> usize {
        self.order
    }

    /// alpha^n
    #[inline]
    pub fn exp(&self, n: usize) -> u8 {
        self.exp[n % self.order]
    }

    /// Discrete log of a non-zero element
    #[inline]
    pub fn log(&self, a: u8) -> usize {
        self.log[a as usize] as usize
    }

    /// Field multiplication
    #[inline]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[(self.log(a) + self.log(b)) % self.order]
    }

    /// Multiplicative inverse; zero maps to zero
    #[inline]
    pub fn inv(&self, a: u8) -> u8 {
        if a == 0 {
            return 0;
        }
        self.exp[(self.order - self.log(a)) % self.order]
    }

    /// Field division; division by zero yields zero
    pub fn div(&self, a: u8, b: u8) -> u8 {
        self.mul(a, self.inv(b))
    }

    /// Evaluate `poly` (lowest degree first) at `x` using Horner's rule
    pub fn poly_eval(&self, poly: &[u8], x: u8) -> u8 {
        poly.iter().rev().fold(0, |acc, &c| self.mul(acc, x) ^ c)
    }

    /// Berlekamp-Massey: shortest LFSR generating `syndromes`.
    ///
    /// Returns the error locator polynomial, lowest degree first, truncated
    /// to `L + 1` coefficients where `L` is the number of errors it locates.
    pub fn berlekamp_massey(&self, syndromes: &[u8]) -> Vec<u8> {
        let n = syndromes.len();
        let mut sigma = vec![0u8; n + 1];
        let mut prev = vec![0u8; n + 1];
        sigma[0] = 1;
        prev[0] = 1;

        let mut l = 0usize;
        let mut m = 1usize;
        let mut prev_discrepancy = 1u8;

        for i in 0..n {
            let mut delta = syndromes[i];
            for j in 1..=l {
                delta ^= self.mul(sigma[j], syndromes[i - j]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let saved = sigma.clone();
            let coef = self.div(delta, prev_discrepancy);
            for j in 0..=n - m {
                sigma[j + m] ^= self.mul(coef, prev[j]);
            }

            if 2 * l <= i {
                l = i + 1 - l;
                prev = saved;
                prev_discrepancy = delta;
                m = 1;
            } else {
                m += 1;
            }
        }

        sigma.truncate(l + 1);
        sigma
    }
}
