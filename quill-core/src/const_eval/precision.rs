//! Cheap upper bounds on the size of a power before computing it.
//!
//! Every check here is conservative: it may reject a result that would have
//! fit, but never accepts one that exceeds [MAX_PRECISION_BITS].

use num_bigint::BigUint;
use num_traits::Zero;

/// Bit budget for any intermediate constant.
pub const MAX_PRECISION_BITS: u64 = 4096;

/// Whether `base ^ exponent` stays within [MAX_PRECISION_BITS].
pub fn fits_exponentiation(base: &BigUint, exponent: u32) -> bool {
    if base.is_zero() {
        return true;
    }
    let msb = base.bits() - 1;
    if msb == 0 {
        return true;
    }
    if msb > MAX_PRECISION_BITS {
        return false;
    }
    u64::from(exponent) * (msb + 1) <= MAX_PRECISION_BITS
}

/// Whether `mantissa * 2 ^ shift` stays within [MAX_PRECISION_BITS].
pub fn fits_scaling(mantissa: &BigUint, shift: u32) -> bool {
    fits_precision_base_x(mantissa, 1.0, shift)
}

/// Whether `mantissa * 10 ^ exponent` stays within [MAX_PRECISION_BITS].
/// Used when expanding scientific notation in number literals.
pub fn fits_decimal_scaling(mantissa: &BigUint, exponent: u32) -> bool {
    fits_precision_base_x(mantissa, std::f64::consts::LOG2_10, exponent)
}

fn fits_precision_base_x(mantissa: &BigUint, log2_of_base: f64, exponent: u32) -> bool {
    if mantissa.is_zero() {
        return true;
    }
    let msb = mantissa.bits() - 1;
    if msb > MAX_PRECISION_BITS {
        return false;
    }
    let scaled_bits = (f64::from(exponent) * log2_of_base).floor() as u64;
    msb + scaled_bits + 1 <= MAX_PRECISION_BITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn big(value: u64) -> BigUint {
        BigUint::from(value)
    }

    #[test]
    fn trivial_bases_always_fit() {
        assert!(fits_exponentiation(&BigUint::zero(), u32::MAX));
        assert!(fits_exponentiation(&BigUint::one(), u32::MAX));
    }

    #[test]
    fn exponent_budget() {
        // 2 has msb 1, so each factor costs two bits.
        assert!(fits_exponentiation(&big(2), 2048));
        assert!(!fits_exponentiation(&big(2), 2049));
        assert!(fits_exponentiation(&big(255), 512));
        assert!(!fits_exponentiation(&big(256), 512));
    }

    #[test]
    fn huge_base_is_rejected_outright() {
        let huge = BigUint::one() << 4097usize;
        assert!(!fits_exponentiation(&huge, 1));
        assert!(!fits_scaling(&huge, 0));
    }

    #[test]
    fn scaling_budget() {
        assert!(fits_scaling(&big(1), 4095));
        assert!(!fits_scaling(&big(1), 4096));
        assert!(fits_scaling(&big(3), 4094));
        assert!(!fits_scaling(&big(3), 4095));
        assert!(fits_scaling(&BigUint::zero(), u32::MAX));
    }

    #[test]
    fn decimal_scaling_budget() {
        // floor(1232 * log2(10)) = 4092
        assert!(fits_decimal_scaling(&big(1), 1232));
        assert!(!fits_decimal_scaling(&big(1), 1234));
        assert!(fits_decimal_scaling(&big(25), 77));
    }
}
