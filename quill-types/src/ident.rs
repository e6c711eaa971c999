use crate::{span::Span, Spanned};
use std::{
    cmp::{Ord, Ordering},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

pub trait Named {
    fn name(&self) -> &BaseIdent;
}

#[derive(Clone)]
pub struct BaseIdent {
    name_override_opt: Option<Arc<String>>,
    span: Span,
}

impl BaseIdent {
    pub fn as_str(&self) -> &str {
        self.name_override_opt
            .as_deref()
            .map(|x| x.as_str())
            .unwrap_or_else(|| self.span.as_str())
    }

    /// Unnamed bindings, such as anonymous return variables, have an empty name.
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn new(span: Span) -> Ident {
        Ident {
            name_override_opt: None,
            span,
        }
    }

    pub fn new_with_override(name_override: String, span: Span) -> Ident {
        Ident {
            name_override_opt: Some(Arc::new(name_override)),
            span,
        }
    }

    pub fn new_no_span(name: String) -> Ident {
        Ident {
            name_override_opt: Some(Arc::new(name)),
            span: Span::dummy(),
        }
    }

    pub fn unnamed(span: Span) -> Ident {
        Ident::new_with_override(String::new(), span)
    }
}

/// An [Ident] is an _identifier_ with a corresponding `span` from which it was derived.
/// Hashing, equality and ordering only look at the textual name.
pub type Ident = BaseIdent;

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Ident {}

impl Ord for Ident {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}
