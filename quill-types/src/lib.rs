pub mod ident;
pub use ident::*;

pub mod integer_bits;
pub use integer_bits::*;

pub mod rational;
pub use rational::*;

pub mod source_engine;
pub use source_engine::*;

pub mod span;
pub use span::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric handle for a source file registered with the [SourceEngine].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId {
    id: u32,
}

impl SourceId {
    pub fn new(id: u32) -> Self {
        SourceId { id }
    }

    pub fn as_u32(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

pub trait Spanned {
    fn span(&self) -> Span;
}

impl<T: Spanned> Spanned for Box<T> {
    fn span(&self) -> Span {
        (**self).span()
    }
}
