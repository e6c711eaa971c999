use crate::SourceId;
use std::{cmp::Ordering, fmt, hash::Hash, sync::Arc};

/// A byte range into a source file.
///
/// Equality, hashing and ordering only look at `(source_id, start, end)`, so
/// two spans over the same range of the same file are the same location.
#[derive(Clone)]
pub struct Span {
    src: Arc<str>,
    start: usize,
    end: usize,
    source_id: Option<SourceId>,
}

impl Span {
    pub fn new(src: Arc<str>, start: usize, end: usize, source_id: Option<SourceId>) -> Option<Span> {
        src.get(start..end)?;
        Some(Span {
            src,
            start,
            end,
            source_id,
        })
    }

    /// A span covering `needle` inside `src`, located by its first occurrence.
    pub fn find(src: &Arc<str>, needle: &str, source_id: Option<SourceId>) -> Option<Span> {
        let start = src.find(needle)?;
        Span::new(src.clone(), start, start + needle.len(), source_id)
    }

    pub fn dummy() -> Span {
        Span {
            src: Arc::from(""),
            start: 0,
            end: 0,
            source_id: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.src[self.start..self.end]
    }

    pub fn src(&self) -> &Arc<str> {
        &self.src
    }

    pub fn source_id(&self) -> Option<&SourceId> {
        self.source_id.as_ref()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_same_source(&self, other: &Span) -> bool {
        self.source_id == other.source_id && Arc::ptr_eq(&self.src, &other.src)
    }

    /// The smallest span covering both `s1` and `s2`.
    ///
    /// Spans from different sources cannot be joined; `s1` is returned unchanged.
    pub fn join(s1: Span, s2: &Span) -> Span {
        if !s1.is_same_source(s2) {
            return s1;
        }
        Span {
            start: s1.start.min(s2.start),
            end: s1.end.max(s2.end),
            ..s1
        }
    }

    /// Line and column (both 1-based) of the span start.
    pub fn start_pos(&self) -> (usize, usize) {
        let before = &self.src[..self.start];
        let line = before.matches('\n').count() + 1;
        let col = before.rfind('\n').map_or(self.start, |nl| self.start - nl - 1) + 1;
        (line, col)
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.source_id == other.source_id && self.start == other.start && self.end == other.end
    }
}

impl Eq for Span {}

impl Hash for Span {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.source_id.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.source_id, self.start, self.end).cmp(&(other.source_id, other.start, other.end))
    }
}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Span")
            .field("src (ptr)", &self.src.as_ptr())
            .field("source_id", &self.source_id)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("as_str()", &self.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_covers_both_ranges() {
        let src: Arc<str> = Arc::from("revert(); x = 1; y = 2;");
        let x = Span::find(&src, "x = 1;", None).unwrap();
        let y = Span::find(&src, "y = 2;", None).unwrap();
        let joined = Span::join(y.clone(), &x);
        assert_eq!(joined.as_str(), "x = 1; y = 2;");
        assert!(x < y);
    }

    #[test]
    fn join_ignores_foreign_source() {
        let a = Span::new(Arc::from("abc"), 0, 1, Some(SourceId::new(0))).unwrap();
        let b = Span::new(Arc::from("abc"), 1, 3, Some(SourceId::new(1))).unwrap();
        assert_eq!(Span::join(a.clone(), &b), a);
    }

    #[test]
    fn start_pos_is_one_based() {
        let src: Arc<str> = Arc::from("function f() {\n    revert();\n}");
        let span = Span::find(&src, "revert", None).unwrap();
        assert_eq!(span.start_pos(), (2, 5));
    }

    #[test]
    fn out_of_range_span_is_rejected() {
        assert!(Span::new(Arc::from("ab"), 1, 3, None).is_none());
    }
}
