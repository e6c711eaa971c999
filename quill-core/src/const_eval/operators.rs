//! Constant folding of single operators over exact rationals.
//!
//! Nothing here reports diagnostics: an undefined combination simply has no
//! result, and the caller decides what that means.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use quill_types::Rational;

use super::precision::{fits_exponentiation, fits_scaling};
use crate::language::{BinaryOperator, UnaryOperator};

/// Folds `left op right`. Comparison and boolean operators have no rational
/// result and always yield `None`.
pub fn evaluate_binary_operator(
    op: BinaryOperator,
    left: &Rational,
    right: &Rational,
) -> Option<Rational> {
    use BinaryOperator::*;
    let fractional = !left.is_integer() || !right.is_integer();
    match op {
        BitOr | BitXor | BitAnd => {
            if fractional {
                return None;
            }
            let (l, r) = (left.numerator(), right.numerator());
            let value = match op {
                BitOr => l | r,
                BitXor => l ^ r,
                _ => l & r,
            };
            Some(Rational::from_integer(value))
        }
        Add => Some(left + right),
        Sub => Some(left - right),
        Mul => Some(left * right),
        Div => left.checked_div(right),
        Mod => {
            if right.is_zero() {
                return None;
            }
            if fractional {
                let quotient = Rational::from_integer(left.checked_div(right)?.trunc());
                Some(left - &(&quotient * right))
            } else {
                Some(Rational::from_integer(left.numerator() % right.numerator()))
            }
        }
        Exp => evaluate_exponentiation(left, right),
        Shl => evaluate_shift_left(left, right, fractional),
        Sar => evaluate_arithmetic_shift_right(left, right, fractional),
        Shr | Or | And | Equal | NotEqual | LessThan | GreaterThan | LessThanOrEqual
        | GreaterThanOrEqual => None,
    }
}

/// Folds `op operand`.
pub fn evaluate_unary_operator(op: UnaryOperator, operand: &Rational) -> Option<Rational> {
    match op {
        UnaryOperator::BitNot if operand.is_integer() => {
            Some(Rational::from_integer(!operand.numerator()))
        }
        UnaryOperator::Sub => Some(-operand),
        _ => None,
    }
}

fn evaluate_exponentiation(base: &Rational, exponent: &Rational) -> Option<Rational> {
    if !exponent.is_integer() {
        return None;
    }
    let exponent = exponent.numerator();
    if exponent.is_zero() {
        return Some(Rational::one());
    }
    if base.is_zero() || base.is_one() {
        return Some(base.clone());
    }
    if *base == Rational::from(-1) {
        let is_even = (exponent % BigInt::from(2)).is_zero();
        return Some(Rational::from(if is_even { 1 } else { -1 }));
    }

    let magnitude = exponent.magnitude().to_u32()?;
    if !fits_exponentiation(base.numerator().magnitude(), magnitude)
        || !fits_exponentiation(base.denominator().magnitude(), magnitude)
    {
        return None;
    }
    let power = base.pow(magnitude);
    if exponent.is_negative() {
        power.recip()
    } else {
        Some(power)
    }
}

/// The shift amount of a shift operator, if it is a non-negative integer
/// that fits 32 bits.
fn shift_amount(amount: &Rational) -> Option<u32> {
    if amount.is_negative() {
        return None;
    }
    amount.numerator().to_u32()
}

fn evaluate_shift_left(value: &Rational, amount: &Rational, fractional: bool) -> Option<Rational> {
    if fractional {
        return None;
    }
    let shift = shift_amount(amount)?;
    if value.is_zero() {
        return Some(Rational::zero());
    }
    if !fits_scaling(value.numerator().magnitude(), shift) {
        return None;
    }
    Some(Rational::from_integer(
        value.numerator() * BigInt::from(2u8).pow(shift),
    ))
}

fn evaluate_arithmetic_shift_right(
    value: &Rational,
    amount: &Rational,
    fractional: bool,
) -> Option<Rational> {
    if fractional {
        return None;
    }
    let shift = shift_amount(amount)?;
    if value.is_zero() {
        return Some(Rational::zero());
    }
    let numerator = value.numerator();
    let msb = numerator.magnitude().bits() - 1;
    if u64::from(shift) > msb {
        return Some(if numerator.is_negative() {
            Rational::from(-1)
        } else {
            Rational::zero()
        });
    }
    let divisor = BigInt::from(2u8).pow(shift);
    // Integer division truncates toward zero; bias negative values so the
    // result rounds toward negative infinity instead.
    let shifted = if numerator.is_negative() {
        (numerator + BigInt::one()) / divisor - BigInt::one()
    } else {
        numerator / divisor
    };
    Some(Rational::from_integer(shifted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use BinaryOperator::*;

    fn int(value: i64) -> Rational {
        Rational::from(value)
    }

    fn frac(n: i64, d: i64) -> Rational {
        Rational::new(BigInt::from(n), BigInt::from(d)).unwrap()
    }

    #[test]
    fn division_round_trips() {
        for (l, r) in [(7, 3), (-7, 3), (0, 5), (12, -4), (i64::MAX, 97)] {
            let quotient = evaluate_binary_operator(Div, &int(l), &int(r)).unwrap();
            assert_eq!(&quotient * &int(r), int(l));
        }
        assert_eq!(evaluate_binary_operator(Div, &int(1), &int(0)), None);
    }

    #[test]
    fn modulo() {
        assert_eq!(evaluate_binary_operator(Mod, &int(-7), &int(3)), Some(int(-1)));
        assert_eq!(evaluate_binary_operator(Mod, &int(7), &int(-3)), Some(int(1)));
        assert_eq!(
            evaluate_binary_operator(Mod, &frac(7, 2), &int(2)),
            Some(frac(3, 2))
        );
        assert_eq!(
            evaluate_binary_operator(Mod, &frac(-7, 2), &int(2)),
            Some(frac(-3, 2))
        );
        assert_eq!(evaluate_binary_operator(Mod, &int(5), &int(0)), None);
    }

    #[test]
    fn bitwise_needs_integers() {
        assert_eq!(evaluate_binary_operator(BitAnd, &int(12), &int(10)), Some(int(8)));
        assert_eq!(evaluate_binary_operator(BitOr, &int(12), &int(10)), Some(int(14)));
        assert_eq!(evaluate_binary_operator(BitXor, &int(12), &int(10)), Some(int(6)));
        assert_eq!(evaluate_binary_operator(BitAnd, &int(-1), &int(255)), Some(int(255)));
        assert_eq!(evaluate_binary_operator(BitOr, &frac(1, 2), &int(1)), None);
    }

    #[test]
    fn exponentiation() {
        assert_eq!(evaluate_binary_operator(Exp, &int(3), &int(4)), Some(int(81)));
        assert_eq!(evaluate_binary_operator(Exp, &int(2), &int(-2)), Some(frac(1, 4)));
        assert_eq!(
            evaluate_binary_operator(Exp, &frac(-2, 3), &int(-3)),
            Some(frac(-27, 8))
        );
        assert_eq!(evaluate_binary_operator(Exp, &int(5), &int(0)), Some(int(1)));
        assert_eq!(evaluate_binary_operator(Exp, &int(0), &int(7)), Some(int(0)));
        assert_eq!(evaluate_binary_operator(Exp, &int(1), &int(-7)), Some(int(1)));
        assert_eq!(evaluate_binary_operator(Exp, &int(2), &frac(1, 2)), None);
    }

    #[test]
    fn exponentiation_of_minus_one_skips_the_guard() {
        let huge = Rational::from_integer(BigInt::one() << 40usize);
        assert_eq!(evaluate_binary_operator(Exp, &int(-1), &huge), Some(int(1)));
        let odd = &huge + &int(1);
        assert_eq!(evaluate_binary_operator(Exp, &int(-1), &odd), Some(int(-1)));
    }

    #[test]
    fn exponentiation_respects_the_guard() {
        // Whenever the guard accepts, the exact power is produced.
        for (base, exponent) in [(2u64, 2048u32), (255, 512), (10, 77), (3, 100)] {
            assert!(fits_exponentiation(&base.into(), exponent));
            let expected = Rational::from_integer(BigInt::from(base).pow(exponent));
            assert_eq!(
                evaluate_binary_operator(Exp, &int(base as i64), &int(exponent.into())),
                Some(expected)
            );
        }
        // Whenever it rejects, there is no result.
        for (base, exponent) in [(2u64, 2049u32), (256, 512), (10, 1025)] {
            assert!(!fits_exponentiation(&base.into(), exponent));
            assert_eq!(
                evaluate_binary_operator(Exp, &int(base as i64), &int(exponent.into())),
                None
            );
        }
        // The denominator is guarded as well.
        assert_eq!(evaluate_binary_operator(Exp, &frac(1, 256), &int(512)), None);
        let too_large = Rational::from_integer(BigInt::from(u32::MAX) + 1);
        assert_eq!(evaluate_binary_operator(Exp, &int(2), &too_large), None);
    }

    #[test]
    fn shifting_left() {
        assert_eq!(evaluate_binary_operator(Shl, &int(3), &int(4)), Some(int(48)));
        assert_eq!(evaluate_binary_operator(Shl, &int(-3), &int(1)), Some(int(-6)));
        assert_eq!(evaluate_binary_operator(Shl, &int(0), &int(1 << 20)), Some(int(0)));
        assert_eq!(evaluate_binary_operator(Shl, &int(0), &int(1 << 40)), None);
        assert_eq!(evaluate_binary_operator(Shl, &int(1), &int(-1)), None);
        assert_eq!(evaluate_binary_operator(Shl, &int(1), &int(4096)), None);
        assert_eq!(evaluate_binary_operator(Shl, &frac(1, 2), &int(1)), None);
    }

    #[test]
    fn shift_then_unshift_is_identity() {
        for x in [0i64, 1, 2, 5, 1000, i64::MAX] {
            for k in 0..=64 {
                let shifted = evaluate_binary_operator(Shl, &int(x), &int(k)).unwrap();
                assert_eq!(
                    evaluate_binary_operator(Sar, &shifted, &int(k)),
                    Some(int(x)),
                    "x = {x}, k = {k}"
                );
            }
        }
    }

    #[test]
    fn arithmetic_shift_right_rounds_down() {
        assert_eq!(evaluate_binary_operator(Sar, &int(-5), &int(1)), Some(int(-3)));
        assert_eq!(evaluate_binary_operator(Sar, &int(-4), &int(1)), Some(int(-2)));
        assert_eq!(evaluate_binary_operator(Sar, &int(-2), &int(1)), Some(int(-1)));
        assert_eq!(evaluate_binary_operator(Sar, &int(5), &int(1)), Some(int(2)));
        assert_eq!(evaluate_binary_operator(Sar, &int(-1), &int(1)), Some(int(-1)));
        assert_eq!(evaluate_binary_operator(Sar, &int(-8), &int(100)), Some(int(-1)));
        assert_eq!(evaluate_binary_operator(Sar, &int(8), &int(100)), Some(int(0)));
        assert_eq!(evaluate_binary_operator(Sar, &int(8), &frac(1, 2)), None);
    }

    #[test]
    fn comparisons_are_not_folded_here() {
        assert_eq!(evaluate_binary_operator(LessThan, &int(1), &int(2)), None);
        assert_eq!(evaluate_binary_operator(And, &int(1), &int(1)), None);
        assert_eq!(evaluate_binary_operator(Shr, &int(8), &int(1)), None);
    }

    #[test]
    fn unary() {
        assert_eq!(evaluate_unary_operator(UnaryOperator::BitNot, &int(0)), Some(int(-1)));
        assert_eq!(evaluate_unary_operator(UnaryOperator::BitNot, &int(5)), Some(int(-6)));
        assert_eq!(evaluate_unary_operator(UnaryOperator::BitNot, &frac(1, 2)), None);
        assert_eq!(evaluate_unary_operator(UnaryOperator::Sub, &frac(1, 2)), Some(frac(-1, 2)));
        assert_eq!(evaluate_unary_operator(UnaryOperator::Not, &int(1)), None);
        assert_eq!(evaluate_unary_operator(UnaryOperator::Inc, &int(1)), None);
    }
}
