/// Reed-Solomon error correction for QR data blocks.
///
/// Codewords are stored highest degree first: `block[0]` is the coefficient
/// of x^(n-1). The generator has roots alpha^0 .. alpha^(ecc-1).
use super::galois::GF256;
use crate::error::DecodeError;

/// Reed-Solomon decoder for one block layout
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    /// Decoder for blocks carrying `num_ecc_codewords` check bytes
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `block` in place, returning the number of bytes fixed.
    ///
    /// Fails with [`DecodeError::DataEcc`] when more than `ecc / 2` bytes
    /// are wrong, or when the correction does not produce a valid codeword.
    pub fn decode(&self, block: &mut [u8]) -> Result<usize, DecodeError> {
        let n = block.len();
        if n == 0 || n > GF256.order() {
            return Err(DecodeError::DataEcc);
        }

        let (syndromes, nonzero) = self.syndromes(block);
        if !nonzero {
            return Ok(0);
        }

        let sigma = GF256.berlekamp_massey(&syndromes);
        let errors = sigma.len() - 1;
        if 2 * errors > self.num_ecc_codewords {
            return Err(DecodeError::DataEcc);
        }

        let omega = self.error_evaluator(&sigma, &syndromes);
        let positions = self.find_error_positions(&sigma, n);
        if positions.len() != errors {
            return Err(DecodeError::DataEcc);
        }

        for &pos in &positions {
            let value = self.error_value(&sigma, &omega, n - 1 - pos)?;
            block[pos] ^= value;
        }

        if self.syndromes(block).1 {
            return Err(DecodeError::DataEcc);
        }
        Ok(errors)
    }

    /// S_i = c(alpha^i) for i in 0..ecc, plus whether any is non-zero
    fn syndromes(&self, block: &[u8]) -> (Vec<u8>, bool) {
        let n = block.len();
        let mut nonzero = false;
        let syndromes = (0..self.num_ecc_codewords)
            .map(|i| {
                let s = block.iter().enumerate().fold(0u8, |acc, (j, &c)| {
                    acc ^ GF256.mul(c, GF256.exp(i * (n - 1 - j)))
                });
                nonzero |= s != 0;
                s
            })
            .collect();
        (syndromes, nonzero)
    }

    /// omega = S(x) * sigma(x) mod x^ecc
    fn error_evaluator(&self, sigma: &[u8], syndromes: &[u8]) -> Vec<u8> {
        let mut omega = vec![0u8; self.num_ecc_codewords];
        for (i, term) in omega.iter_mut().enumerate() {
            for (j, &s) in sigma.iter().enumerate().take(i + 1) {
                *term ^= GF256.mul(s, syndromes[i - j]);
            }
        }
        omega
    }

    /// Chien search: position `p` is in error when sigma(alpha^-(n-1-p)) == 0
    fn find_error_positions(&self, sigma: &[u8], n: usize) -> Vec<usize> {
        (0..n)
            .filter(|&p| {
                let x_inv = GF256.exp(GF256.order() - (n - 1 - p) % GF256.order());
                GF256.poly_eval(sigma, x_inv) == 0
            })
            .collect()
    }

    /// Forney: e = X * omega(X^-1) / sigma'(X^-1) with X = alpha^power
    fn error_value(&self, sigma: &[u8], omega: &[u8], power: usize) -> Result<u8, DecodeError> {
        let x = GF256.exp(power);
        let x_inv = GF256.inv(x);

        // Formal derivative keeps the odd terms only
        let mut derivative = 0u8;
        for i in (1..sigma.len()).step_by(2) {
            derivative ^= GF256.mul(sigma[i], GF256.exp(GF256.log(x_inv) * (i - 1)));
        }
        if derivative == 0 {
            return Err(DecodeError::DataEcc);
        }

        let numerator = GF256.poly_eval(omega, x_inv);
        Ok(GF256.mul(x, GF256.div(numerator, derivative)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RS encoder for testing: appends `num_ecc` ECC bytes to `data`.
    fn rs_encode(data: &[u8], num_ecc: usize) -> Vec<u8> {
        // Generator polynomial, lowest degree first
        let mut gpoly = vec![0u8; num_ecc + 1];
        gpoly[0] = 1;
        for i in 0..num_ecc {
            let root = GF256.exp(i);
            for j in (1..=i + 1).rev() {
                gpoly[j] = gpoly[j - 1] ^ GF256.mul(gpoly[j], root);
            }
            gpoly[0] = GF256.mul(gpoly[0], root);
        }

        // Non-leading coefficients, highest degree first
        let mut gpoly_div: Vec<u8> = gpoly[0..num_ecc].to_vec();
        gpoly_div.reverse();

        let mut remainder = vec![0u8; num_ecc];
        for &d in data {
            let factor = d ^ remainder[0];
            remainder.rotate_left(1);
            remainder[num_ecc - 1] = 0;
            for j in 0..num_ecc {
                remainder[j] ^= GF256.mul(gpoly_div[j], factor);
            }
        }

        let mut codeword = data.to_vec();
        codeword.extend_from_slice(&remainder);
        codeword
    }

    #[test]
    fn test_no_errors() {
        let data = vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60];
        let mut codeword = rs_encode(&data, 10);
        assert_eq!(ReedSolomonDecoder::new(10).decode(&mut codeword), Ok(0));
        assert_eq!(&codeword[..data.len()], &data);
    }

    #[test]
    fn test_correct_single_error() {
        let data = vec![0x00; 10];
        let mut codeword = rs_encode(&data, 10);
        codeword[3] ^= 0xAB;
        assert_eq!(ReedSolomonDecoder::new(10).decode(&mut codeword), Ok(1));
        assert_eq!(&codeword[..data.len()], &data);
    }

    #[test]
    fn test_correct_up_to_half_ecc() {
        let data: Vec<u8> = "4376471154038".bytes().collect();
        let original = rs_encode(&data, 10);
        let mut codeword = original.clone();
        for (k, pos) in [0, 4, 7, 12, 20].into_iter().enumerate() {
            codeword[pos] ^= 0x11 * (k as u8 + 1);
        }
        assert_eq!(ReedSolomonDecoder::new(10).decode(&mut codeword), Ok(5));
        assert_eq!(codeword, original);
    }

    #[test]
    fn test_too_many_errors() {
        let data = vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
        let mut codeword = rs_encode(&data, 10);
        for pos in 0..6 {
            codeword[pos] ^= 0x5A;
        }
        assert_eq!(
            ReedSolomonDecoder::new(10).decode(&mut codeword),
            Err(DecodeError::DataEcc)
        );
    }

    #[test]
    fn test_correct_errors_in_ecc_bytes() {
        let data = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        let mut codeword = rs_encode(&data, 8);
        let total = codeword.len();
        codeword[total - 1] ^= 0xFF;
        codeword[total - 2] ^= 0x33;
        assert_eq!(ReedSolomonDecoder::new(8).decode(&mut codeword), Ok(2));
        assert_eq!(&codeword[..data.len()], &data);
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(
            ReedSolomonDecoder::new(4).decode(&mut []),
            Err(DecodeError::DataEcc)
        );
    }
}
