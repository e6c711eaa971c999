mod declaration;
mod expression;

pub use declaration::*;
pub use expression::*;
