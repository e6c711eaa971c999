use crate::diagnostic::{Code, Diagnostic, Hint, Issue, Reason, ToDiagnostic};

use core::fmt;
use quill_types::{SourceEngine, SourceId, Span, Spanned};
use thiserror::Error;

/// Where a pointer-typed variable refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerLocation {
    Storage,
    CallData,
}

impl fmt::Display for PointerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerLocation::Storage => write!(f, "storage"),
            PointerLocation::CallData => write!(f, "calldata"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompileError {
    #[error("Cyclic constant definition (or maximum recursion depth exhausted).")]
    CyclicConstantDefinition { span: Span },
    #[error("Arithmetic error when computing constant value.")]
    ConstantArithmeticError { span: Span },
    #[error("Operator {op} not compatible with types {lhs_type} and {rhs_type}.")]
    OperatorNotCompatibleWithTypes {
        op: String,
        lhs_type: String,
        rhs_type: String,
        span: Span,
    },
    #[error(
        "This variable is of {location} pointer type and can be {} without prior assignment, \
         which would lead to undefined behaviour.",
        if *is_return { "returned" } else { "accessed" }
    )]
    UninitializedPointerAccess {
        location: PointerLocation,
        is_return: bool,
        span: Span,
        /// Present when the access has its own location, distinct from the declaration.
        declaration_span: Option<Span>,
    },
}

impl CompileError {
    /// Fatal errors stop the evaluation that produced them.
    pub fn is_fatal(&self) -> bool {
        use CompileError::*;
        match self {
            CyclicConstantDefinition { .. }
            | ConstantArithmeticError { .. }
            | OperatorNotCompatibleWithTypes { .. } => true,
            UninitializedPointerAccess { .. } => false,
        }
    }

    pub fn source_id(&self) -> Option<SourceId> {
        self.span().source_id().cloned()
    }
}

impl Spanned for CompileError {
    fn span(&self) -> Span {
        use CompileError::*;
        match self {
            CyclicConstantDefinition { span }
            | ConstantArithmeticError { span }
            | OperatorNotCompatibleWithTypes { span, .. }
            | UninitializedPointerAccess { span, .. } => span.clone(),
        }
    }
}

impl ToDiagnostic for CompileError {
    fn to_diagnostic(&self, source_engine: &SourceEngine) -> Diagnostic {
        use CompileError::*;
        let issue = Issue::error(source_engine, self.span(), self.to_string());
        match self {
            CyclicConstantDefinition { .. } => Diagnostic {
                reason: Reason::new(Code::constant_evaluation(1), "Constant definitions form a cycle".to_string()),
                issue,
                hints: vec![],
                help: vec![
                    "Constants may refer to other constants only if the references do not loop back.".to_string(),
                ],
                fatal: true,
            },
            ConstantArithmeticError { .. } => Diagnostic {
                reason: Reason::new(Code::constant_evaluation(2), "Constant value does not fit its type".to_string()),
                issue,
                hints: vec![],
                help: vec![],
                fatal: true,
            },
            OperatorNotCompatibleWithTypes { op, .. } => Diagnostic {
                reason: Reason::new(Code::type_checking(1), format!("Operator \"{op}\" cannot be applied to these operands")),
                issue,
                hints: vec![],
                help: vec![],
                fatal: true,
            },
            UninitializedPointerAccess { declaration_span, location, .. } => Diagnostic {
                reason: Reason::new(Code::control_flow_analysis(1), format!("Uninitialized {location} pointer")),
                issue,
                hints: declaration_span
                    .iter()
                    .map(|span| Hint::info(source_engine, span.clone(), "The variable was declared here.".to_string()))
                    .collect(),
                help: vec!["Assign the variable on every code path before it is used.".to_string()],
                fatal: false,
            },
        }
    }
}
