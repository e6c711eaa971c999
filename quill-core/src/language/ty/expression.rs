use std::sync::Arc;

use quill_types::{Ident, Span, Spanned};

use crate::{
    concurrent_slab::ConcurrentSlab,
    decl_engine::ReferencedDeclaration,
    language::{BinaryOperator, Literal, UnaryOperator},
};

/// Identity of an expression node. Two structurally equal expressions at
/// different places in the source have different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpressionId(usize);

impl ExpressionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExpressionKind {
    Literal(Literal),
    Identifier {
        name: Ident,
        referenced_declaration: Option<ReferencedDeclaration>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: ExpressionId,
    },
    BinaryOp {
        op: BinaryOperator,
        lhs: ExpressionId,
        rhs: ExpressionId,
    },
    /// `(a, , b)` or `[a, b]`. Omitted components are `None`.
    Tuple {
        components: Vec<Option<ExpressionId>>,
        is_inline_array: bool,
    },
    /// Calls, member accesses and everything else that never folds to a constant.
    Opaque,
}

impl Spanned for Expression {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Arena owning every expression of the program being analyzed.
#[derive(Debug, Default)]
pub struct ExpressionEngine {
    slab: ConcurrentSlab<Expression>,
}

impl ExpressionEngine {
    pub fn insert(&self, kind: ExpressionKind, span: Span) -> ExpressionId {
        ExpressionId(self.slab.insert(Expression { kind, span }))
    }

    pub fn get(&self, id: ExpressionId) -> Arc<Expression> {
        self.slab.get(id.0)
    }

    pub fn literal(&self, literal: Literal, span: Span) -> ExpressionId {
        self.insert(ExpressionKind::Literal(literal), span)
    }

    pub fn identifier(
        &self,
        name: Ident,
        referenced_declaration: Option<ReferencedDeclaration>,
    ) -> ExpressionId {
        let span = name.span();
        self.insert(
            ExpressionKind::Identifier {
                name,
                referenced_declaration,
            },
            span,
        )
    }

    pub fn unary(&self, op: UnaryOperator, operand: ExpressionId, span: Span) -> ExpressionId {
        self.insert(ExpressionKind::UnaryOp { op, operand }, span)
    }

    pub fn binary(
        &self,
        op: BinaryOperator,
        lhs: ExpressionId,
        rhs: ExpressionId,
        span: Span,
    ) -> ExpressionId {
        self.insert(ExpressionKind::BinaryOp { op, lhs, rhs }, span)
    }
}
