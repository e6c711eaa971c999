use crate::{error::CompileError, warning::CompileWarning};

use core::cell::RefCell;

/// A handler with which you can emit diagnostics.
#[derive(Default, Debug)]
pub struct Handler {
    /// The inner handler.
    /// This construction is used to avoid `&mut` all over the compiler.
    inner: RefCell<HandlerInner>,
}

/// Contains the actual data for `Handler`.
/// Modelled this way to afford an POD type without `RefCell` for `scope`.
#[derive(Default, Debug)]
struct HandlerInner {
    /// The sink through which errors will be emitted.
    errors: Vec<CompileError>,
    /// The sink through which warnings will be emitted.
    warnings: Vec<CompileWarning>,
}

impl Handler {
    /// Emit the error `err`.
    pub fn emit_err(&self, err: CompileError) -> ErrorEmitted {
        self.inner.borrow_mut().errors.push(err);
        ErrorEmitted { _priv: () }
    }

    /// Emit the warning `warn`.
    pub fn emit_warn(&self, warn: CompileWarning) {
        self.inner.borrow_mut().warnings.push(warn);
    }

    pub fn has_errors(&self) -> bool {
        !self.inner.borrow().errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.inner.borrow().warnings.is_empty()
    }

    pub fn has_fatal_errors(&self) -> bool {
        self.inner.borrow().errors.iter().any(CompileError::is_fatal)
    }

    /// Runs `f` with a fresh handler and moves everything it collected into `self`.
    ///
    /// Returns `Err` if `f` emitted any error, even when `f` itself returned `Ok`.
    pub fn scope<T>(
        &self,
        f: impl FnOnce(&Handler) -> Result<T, ErrorEmitted>,
    ) -> Result<T, ErrorEmitted> {
        let scoped_handler = Handler::default();
        let closure_res = f(&scoped_handler);
        match self.append(scoped_handler) {
            Some(err) => Err(err),
            None => closure_res,
        }
    }

    /// Extract all the errors from this handler.
    pub fn consume(self) -> (Vec<CompileError>, Vec<CompileWarning>) {
        let inner = self.inner.into_inner();
        (inner.errors, inner.warnings)
    }

    /// Moves the diagnostics of `other` into `self`.
    /// Returns `Some` if `other` held at least one error.
    pub fn append(&self, other: Handler) -> Option<ErrorEmitted> {
        let other_has_errors = other.has_errors();

        let (errors, warnings) = other.consume();
        for warn in warnings {
            self.emit_warn(warn);
        }
        for err in errors {
            self.emit_err(err);
        }

        if other_has_errors {
            Some(ErrorEmitted { _priv: () })
        } else {
            None
        }
    }
}

/// Proof that an error was emitted through a `Handler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorEmitted {
    _priv: (),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::CompileError, warning::Warning};
    use quill_types::Span;

    #[test]
    fn scope_reports_nested_errors() {
        let handler = Handler::default();
        let res: Result<(), _> = handler.scope(|h| {
            h.emit_warn(CompileWarning {
                span: Span::dummy(),
                warning_content: Warning::UnreachableCode,
            });
            h.emit_err(CompileError::ConstantArithmeticError {
                span: Span::dummy(),
            });
            Ok(())
        });
        assert!(res.is_err());
        assert!(handler.has_fatal_errors());
        let (errors, warnings) = handler.consume();
        assert_eq!(errors.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn scope_without_errors_passes_result_through() {
        let handler = Handler::default();
        assert_eq!(handler.scope(|_| Ok(7)), Ok(7));
        assert!(!handler.has_errors());
    }
}
