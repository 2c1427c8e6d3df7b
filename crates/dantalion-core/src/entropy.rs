//! Order-0 empirical Shannon entropy over byte-value frequencies.

use crate::error::{Error, Result};

/// Entropy values are rounded to this many decimal digits, the precision
/// the search tolerance is defined against.
const ENTROPY_DECIMALS: u32 = 4;

/// Measure the order-0 Shannon entropy of `data` in bits per byte.
///
/// `H = -Σ p(x) log2 p(x)` over the observed symbol frequencies, rounded
/// to four decimal digits. Range [0, 8]. Errors on an empty buffer.
pub fn shannon_entropy(data: &[u8]) -> Result<f64> {
    entropy_of_parts(&[data])
}

/// Measure entropy across several buffer parts as if they were one
/// concatenated buffer. Symbol frequency ignores position, so the search
/// loop can score its two regions without copying them together.
pub fn entropy_of_parts(parts: &[&[u8]]) -> Result<f64> {
    let total: usize = parts.iter().map(|part| part.len()).sum();
    if total == 0 {
        return Err(Error::EmptyInput);
    }

    let mut counts = [0usize; 256];
    for part in parts {
        for &byte in *part {
            counts[byte as usize] += 1;
        }
    }

    let len = total as f64;
    let mut h = 0.0;
    for &count in counts.iter() {
        if count == 0 {
            continue;
        }
        let p = count as f64 / len;
        h -= p * p.log2();
    }

    Ok(round_to(h, ENTROPY_DECIMALS))
}

/// Round `value` to `decimals` decimal digits.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_bytes_measure_eight_bits() {
        let data: Vec<u8> = (0u8..=255).collect();
        assert_eq!(shannon_entropy(&data).unwrap(), 8.0);
    }

    #[test]
    fn test_constant_run_measures_zero() {
        let data = vec![0xAB; 1024];
        assert_eq!(shannon_entropy(&data).unwrap(), 0.0);
    }

    #[test]
    fn test_two_even_symbols_measure_one_bit() {
        let mut data = vec![0u8; 512];
        data.extend(vec![1u8; 512]);
        assert_eq!(shannon_entropy(&data).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(shannon_entropy(&[]), Err(Error::EmptyInput)));
        assert!(matches!(entropy_of_parts(&[&[], &[]]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_rounded_to_four_decimals() {
        // Three equiprobable symbols: H = log2(3) = 1.58496...
        let h = shannon_entropy(&[1, 2, 3]).unwrap();
        assert_eq!(h, 1.585);
    }

    #[test]
    fn test_parts_measure_like_concatenation() {
        let a = [0u8, 1, 2, 3, 3, 3];
        let b = [4u8, 4, 0, 9];
        let mut joined = a.to_vec();
        joined.extend_from_slice(&b);

        assert_eq!(
            entropy_of_parts(&[&a, &b]).unwrap(),
            shannon_entropy(&joined).unwrap()
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.58496, 4), 1.585);
        assert_eq!(round_to(2.34, 1), 2.3);
        assert_eq!(round_to(2.35, 1), 2.4);
    }
}
