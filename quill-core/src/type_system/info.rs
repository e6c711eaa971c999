use std::fmt;

use num_bigint::BigInt;
use num_traits::One;
use quill_error::error::PointerLocation;
use quill_types::{IntegerBits, Rational};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::engine_threading::{DisplayWithEngines, Engines};

/// Handle of a [TypeInfo] stored in the [TypeEngine](super::TypeEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub(super) fn new(index: usize) -> TypeId {
        TypeId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl DisplayWithEngines for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>, engines: &Engines) -> fmt::Result {
        DisplayWithEngines::fmt(&*engines.te().get(*self), f, engines)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DataLocation {
    Storage,
    Memory,
    CallData,
}

impl DataLocation {
    /// Locations whose variables are pointers into persistent or input data.
    pub fn as_pointer_location(&self) -> Option<PointerLocation> {
        match self {
            DataLocation::Storage => Some(PointerLocation::Storage),
            DataLocation::CallData => Some(PointerLocation::CallData),
            DataLocation::Memory => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntegerType {
    pub signed: bool,
    pub bits: IntegerBits,
}

impl IntegerType {
    pub fn unsigned(bits: IntegerBits) -> Self {
        IntegerType {
            signed: false,
            bits,
        }
    }

    pub fn signed(bits: IntegerBits) -> Self {
        IntegerType { signed: true, bits }
    }

    pub fn min_value(&self) -> BigInt {
        if self.signed {
            -(BigInt::one() << (self.bits.bits() as usize - 1))
        } else {
            BigInt::from(0)
        }
    }

    pub fn max_value(&self) -> BigInt {
        let magnitude_bits = if self.signed {
            self.bits.bits() - 1
        } else {
            self.bits.bits()
        };
        (BigInt::one() << magnitude_bits as usize) - 1
    }

    /// Whether `value` lies within the bounds of this type. Fractions are
    /// compared exactly, so `255.5` does not fit `uint8`.
    pub fn fits(&self, value: &Rational) -> bool {
        let min = Rational::from_integer(self.min_value());
        let max = Rational::from_integer(self.max_value());
        *value >= min && *value <= max
    }
}

impl fmt::Display for IntegerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.signed { "int" } else { "uint" };
        write!(f, "{prefix}{}", self.bits)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    /// The type of a number literal or of constant arithmetic on literals.
    /// It carries its exact value.
    RationalNumber(Rational),
    Integer(IntegerType),
    Boolean,
    Address,
    StringLiteral(String),
    /// Arrays, structs, `bytes` and `string`, tagged with where they live.
    Reference {
        name: String,
        location: DataLocation,
    },
    Tuple(Vec<super::TypeId>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum TypeCategory {
    RationalNumber,
    Integer,
    Boolean,
    Address,
    StringLiteral,
    Reference,
    Tuple,
}

impl TypeInfo {
    pub fn category(&self) -> TypeCategory {
        match self {
            TypeInfo::RationalNumber(_) => TypeCategory::RationalNumber,
            TypeInfo::Integer(_) => TypeCategory::Integer,
            TypeInfo::Boolean => TypeCategory::Boolean,
            TypeInfo::Address => TypeCategory::Address,
            TypeInfo::StringLiteral(_) => TypeCategory::StringLiteral,
            TypeInfo::Reference { .. } => TypeCategory::Reference,
            TypeInfo::Tuple(_) => TypeCategory::Tuple,
        }
    }

    /// The value carried by a rational number type.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            TypeInfo::RationalNumber(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn data_location(&self) -> Option<DataLocation> {
        match self {
            TypeInfo::Reference { location, .. } => Some(*location),
            _ => None,
        }
    }
}

impl DisplayWithEngines for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>, engines: &Engines) -> fmt::Result {
        match self {
            TypeInfo::RationalNumber(value) if value.is_integer() => write!(f, "int_const {value}"),
            TypeInfo::RationalNumber(value) => write!(f, "rational_const {value}"),
            TypeInfo::Integer(integer) => write!(f, "{integer}"),
            TypeInfo::Boolean => write!(f, "bool"),
            TypeInfo::Address => write!(f, "address"),
            TypeInfo::StringLiteral(value) => write!(f, "literal_string \"{value}\""),
            TypeInfo::Reference { name, location } => match location {
                DataLocation::Storage => write!(f, "{name} storage pointer"),
                _ => write!(f, "{name} {location}"),
            },
            TypeInfo::Tuple(elements) => {
                let elements = elements
                    .iter()
                    .map(|element| engines.help_out(element).to_string())
                    .collect::<Vec<_>>();
                write!(f, "tuple({})", elements.join(","))
            }
        }
    }
}
