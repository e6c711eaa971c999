mod literal;
mod operator;
pub mod ty;

pub use literal::*;
pub use operator::*;
