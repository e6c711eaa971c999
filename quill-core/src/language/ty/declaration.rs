use quill_types::{Ident, Named, Span, Spanned};

use crate::{decl_engine::ContractId, language::ty::ExpressionId, type_system::TypeId};

/// A state, local, parameter or return variable.
///
/// `type_id` and `value` may be missing while the declaration is only
/// partially analyzed. Unnamed return variables have an empty `name`.
#[derive(Clone, Debug)]
pub struct VariableDeclaration {
    pub name: Ident,
    pub type_id: Option<TypeId>,
    pub value: Option<ExpressionId>,
    pub is_constant: bool,
    pub span: Span,
}

impl VariableDeclaration {
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct FunctionDeclaration {
    pub name: Ident,
    /// The contract the function is lexically defined in.
    pub contract: Option<ContractId>,
    /// `None` for functions without an implementation.
    pub body: Option<FunctionBody>,
    pub span: Span,
}

impl FunctionDeclaration {
    pub fn is_implemented(&self) -> bool {
        self.body.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FunctionBody {
    pub statements: Vec<Span>,
}

impl FunctionBody {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ContractDeclaration {
    pub name: Ident,
    pub span: Span,
}

macro_rules! impl_named_spanned {
    ($($decl:ty),*) => {
        $(
            impl Named for $decl {
                fn name(&self) -> &Ident {
                    &self.name
                }
            }

            impl Spanned for $decl {
                fn span(&self) -> Span {
                    self.span.clone()
                }
            }
        )*
    };
}

impl_named_spanned!(VariableDeclaration, FunctionDeclaration, ContractDeclaration);
