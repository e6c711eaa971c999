use crate::diagnostic::{Code, Diagnostic, Issue, Reason, ToDiagnostic};

use core::fmt;

use quill_types::{Ident, SourceEngine, SourceId, Span, Spanned};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompileWarning {
    pub span: Span,
    pub warning_content: Warning,
}

impl Spanned for CompileWarning {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl CompileWarning {
    pub fn to_friendly_warning_string(&self) -> String {
        self.warning_content.to_string()
    }

    pub fn source_id(&self) -> Option<SourceId> {
        self.span.source_id().cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Warning {
    UnassignedUnnamedReturnVariable {
        /// Set when the function is analyzed as part of a contract that inherits it.
        most_derived_contract: Option<Ident>,
    },
    UnreachableCode,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Warning::*;
        match self {
            UnassignedUnnamedReturnVariable {
                most_derived_contract,
            } => {
                write!(f, "Unnamed return variable can remain unassigned")?;
                if let Some(contract) = most_derived_contract {
                    write!(
                        f,
                        " when the function is called when \"{contract}\" is the most derived contract"
                    )?;
                }
                write!(
                    f,
                    ". Add an explicit return with value to all non-reverting code paths or name the variable."
                )
            }
            UnreachableCode => write!(f, "Unreachable code."),
        }
    }
}

impl ToDiagnostic for CompileWarning {
    fn to_diagnostic(&self, source_engine: &SourceEngine) -> Diagnostic {
        use Warning::*;
        let issue = Issue::warning(source_engine, self.span(), self.to_friendly_warning_string());
        let (code, description) = match &self.warning_content {
            UnassignedUnnamedReturnVariable { .. } => (1, "Unnamed return variable may be unassigned"),
            UnreachableCode => (2, "Unreachable code"),
        };
        Diagnostic {
            reason: Reason::new(Code::warnings(code), description.to_string()),
            issue,
            hints: vec![],
            help: vec![],
            fatal: false,
        }
    }
}
