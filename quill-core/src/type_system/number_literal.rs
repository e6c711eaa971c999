use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use quill_types::Rational;

use crate::{const_eval::fits_decimal_scaling, language::SubDenomination};

/// Parses the source text of a number literal into its exact value.
///
/// Accepts decimal integers and fractions, scientific notation, hexadecimal
/// and `_` digit separators. Returns `None` for anything malformed and for
/// values whose decimal exponent would exceed the precision budget.
pub fn parse_number_literal(text: &str, sub_denomination: Option<SubDenomination>) -> Option<Rational> {
    let value = match text.strip_prefix("0x") {
        Some(digits) => {
            if sub_denomination.is_some() {
                return None;
            }
            parse_hex(digits)?
        }
        None => parse_decimal(text)?,
    };
    Some(match sub_denomination {
        Some(unit) => &value * &Rational::from_integer(BigInt::from(unit.multiplier())),
        None => value,
    })
}

/// Strips `_` separators from a run of digits, rejecting separators at
/// either end or next to each other.
fn strip_separators(digits: &str, radix: u32) -> Option<String> {
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    let stripped: String = digits.chars().filter(|c| *c != '_').collect();
    stripped
        .chars()
        .all(|c| c.is_digit(radix))
        .then_some(stripped)
}

fn parse_hex(digits: &str) -> Option<Rational> {
    let digits = strip_separators(digits, 16)?;
    let value = BigInt::parse_bytes(digits.as_bytes(), 16)?;
    Some(Rational::from_integer(value))
}

fn parse_decimal(text: &str) -> Option<Rational> {
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (text, None),
    };
    let (integer_part, fraction_part) = match mantissa.split_once('.') {
        Some((integer_part, fraction_part)) => (integer_part, fraction_part),
        None => (mantissa, ""),
    };
    let integer_digits = strip_separators(integer_part, 10)?;
    let fraction_digits = strip_separators(fraction_part, 10)?;
    if integer_digits.is_empty() && fraction_digits.is_empty() {
        return None;
    }
    // A leading zero followed by more digits reads as octal elsewhere.
    if integer_digits.len() > 1 && integer_digits.starts_with('0') {
        return None;
    }

    let digits = format!("{integer_digits}{fraction_digits}");
    let numerator = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    let scale = u32::try_from(fraction_digits.len()).ok()?;
    let mut value = Rational::new(numerator, BigInt::from(10u8).pow(scale))?;

    if let Some(exponent) = exponent {
        let (negative, exponent_digits) = match exponent.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, exponent),
        };
        let exponent_digits = strip_separators(exponent_digits, 10)?;
        if exponent_digits.is_empty() {
            return None;
        }
        let mut exponent = BigInt::parse_bytes(exponent_digits.as_bytes(), 10)?;
        if negative {
            exponent = -exponent;
        }
        if exponent.to_i32().is_none() {
            return None;
        }
        if value.is_zero() {
            return Some(value);
        }
        let magnitude = exponent.magnitude().to_u32()?;
        let scaled_part = if exponent.is_negative() {
            value.denominator()
        } else {
            value.numerator()
        };
        if !fits_decimal_scaling(scaled_part.magnitude(), magnitude) {
            return None;
        }
        let scaling = Rational::from_integer(BigInt::from(10u8).pow(magnitude));
        value = if exponent.is_negative() {
            value.checked_div(&scaling)?
        } else {
            &value * &scaling
        };
    }
    Some(value)
}
