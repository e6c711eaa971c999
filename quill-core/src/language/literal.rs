use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unit suffix of a number literal, such as `1 ether` or `2 days`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubDenomination {
    Wei,
    Gwei,
    Ether,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl SubDenomination {
    pub fn multiplier(&self) -> u64 {
        use SubDenomination::*;
        match self {
            Wei | Seconds => 1,
            Gwei => 1_000_000_000,
            Ether => 1_000_000_000_000_000_000,
            Minutes => 60,
            Hours => 3_600,
            Days => 86_400,
            Weeks => 604_800,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Bool(bool),
    /// The source text of a number, digit separators included.
    Number {
        value: String,
        sub_denomination: Option<SubDenomination>,
    },
    String(String),
}

impl Literal {
    pub fn number(value: impl Into<String>) -> Literal {
        Literal::Number {
            value: value.into(),
            sub_denomination: None,
        }
    }

    pub fn number_with_unit(value: impl Into<String>, unit: SubDenomination) -> Literal {
        Literal::Number {
            value: value.into(),
            sub_denomination: Some(unit),
        }
    }
}
