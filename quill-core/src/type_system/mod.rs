mod engine;
mod info;
mod number_literal;

pub use engine::*;
pub use info::*;
pub use number_literal::parse_number_literal;
