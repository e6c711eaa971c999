mod engine;
mod id;

pub use engine::*;
pub use id::*;
