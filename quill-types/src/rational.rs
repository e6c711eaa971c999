//! Exact arbitrary-precision fractions.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

/// A fraction of two [BigInt]s, always kept in lowest terms with a positive
/// denominator. A value is integral exactly when its denominator is one.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rational(BigRational);

impl Rational {
    /// Returns `None` for a zero denominator.
    pub fn new(numerator: BigInt, denominator: BigInt) -> Option<Rational> {
        if denominator.is_zero() {
            return None;
        }
        Some(Rational(BigRational::new(numerator, denominator)))
    }

    pub fn from_integer(value: BigInt) -> Rational {
        Rational(BigRational::from_integer(value))
    }

    pub fn zero() -> Rational {
        Rational(BigRational::zero())
    }

    pub fn one() -> Rational {
        Rational(BigRational::one())
    }

    pub fn numerator(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denominator(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> Rational {
        Rational(self.0.abs())
    }

    /// The integer part, rounded toward zero.
    pub fn trunc(&self) -> BigInt {
        self.0.to_integer()
    }

    pub fn recip(&self) -> Option<Rational> {
        (!self.is_zero()).then(|| Rational(self.0.recip()))
    }

    pub fn checked_div(&self, rhs: &Rational) -> Option<Rational> {
        (!rhs.is_zero()).then(|| Rational(&self.0 / &rhs.0))
    }

    /// Raises to a non-negative power. Callers bound `exponent` beforehand.
    pub fn pow(&self, exponent: u32) -> Rational {
        // Powers of coprime terms stay coprime.
        Rational(BigRational::new_raw(
            self.numerator().pow(exponent),
            self.denominator().pow(exponent),
        ))
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<&Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                Rational((&self.0).$method(&rhs.0))
            }
        }

        impl $imp for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                Rational(self.0.$method(rhs.0))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl From<BigInt> for Rational {
    fn from(value: BigInt) -> Self {
        Rational::from_integer(value)
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::from_integer(BigInt::from(value))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{} / {}", self.numerator(), self.denominator())
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}
