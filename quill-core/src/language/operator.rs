use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum UnaryOperator {
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "~")]
    BitNot,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "++")]
    Inc,
    #[strum(serialize = "--")]
    Dec,
    #[strum(serialize = "delete")]
    Delete,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum BinaryOperator {
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "|")]
    BitOr,
    #[strum(serialize = "^")]
    BitXor,
    #[strum(serialize = "&")]
    BitAnd,
    #[strum(serialize = "<<")]
    Shl,
    /// Arithmetic shift right.
    #[strum(serialize = ">>")]
    Sar,
    /// Logical shift right. Reserved, never a constant.
    #[strum(serialize = ">>>")]
    Shr,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "**")]
    Exp,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = "<")]
    LessThan,
    #[strum(serialize = ">")]
    GreaterThan,
    #[strum(serialize = "<=")]
    LessThanOrEqual,
    #[strum(serialize = ">=")]
    GreaterThanOrEqual,
}

impl BinaryOperator {
    pub fn is_compare_op(&self) -> bool {
        use BinaryOperator::*;
        matches!(
            self,
            Equal | NotEqual | LessThan | GreaterThan | LessThanOrEqual | GreaterThanOrEqual
        )
    }

    pub fn is_boolean_op(&self) -> bool {
        matches!(self, BinaryOperator::Or | BinaryOperator::And)
    }

    pub fn is_bit_op(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, BitOr | BitXor | BitAnd)
    }

    pub fn is_shift_op(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Shl | Sar | Shr)
    }
}
