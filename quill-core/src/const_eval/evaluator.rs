use quill_error::{
    error::CompileError,
    handler::{ErrorEmitted, Handler},
};
use rustc_hash::FxHashMap;

use super::{evaluate_binary_operator, evaluate_unary_operator, narrow, narrow_opt, TypedValue};
use crate::{
    decl_engine::{ReferencedDeclaration, VariableId},
    engine_threading::Engines,
    language::{
        ty::{Expression, ExpressionId, ExpressionKind},
        BinaryOperator, UnaryOperator,
    },
};

/// Constant declarations nested deeper than this are reported as cyclic.
pub const MAX_CONSTANT_RECURSION_DEPTH: usize = 32;

/// A node whose constant value can be cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstNode {
    Expression(ExpressionId),
    Declaration(VariableId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// How often the node was actually evaluated. Never above one.
    pub computed: u32,
    /// How often a cached result was returned instead.
    pub cache_hits: u32,
}

/// Evaluates constant expressions, memoizing every node it visits.
///
/// The cache survives across calls to [ConstantEvaluator::evaluate], so
/// several roots sharing dependencies are computed once. A node whose
/// evaluation stopped with a fatal diagnostic is left uncached.
pub struct ConstantEvaluator<'eng> {
    engines: &'eng Engines,
    values: FxHashMap<ConstNode, Option<TypedValue>>,
    stats: FxHashMap<ConstNode, NodeStats>,
}

impl<'eng> ConstantEvaluator<'eng> {
    pub fn new(engines: &'eng Engines) -> Self {
        ConstantEvaluator {
            engines,
            values: FxHashMap::default(),
            stats: FxHashMap::default(),
        }
    }

    pub fn evaluate(
        &mut self,
        handler: &Handler,
        expr: ExpressionId,
    ) -> Result<Option<TypedValue>, ErrorEmitted> {
        self.evaluate_node(handler, ConstNode::Expression(expr), 0)
    }

    /// Evaluates the initializer of a constant declaration, narrowed to its type.
    pub fn evaluate_declaration(
        &mut self,
        handler: &Handler,
        decl: VariableId,
    ) -> Result<Option<TypedValue>, ErrorEmitted> {
        self.evaluate_node(handler, ConstNode::Declaration(decl), 0)
    }

    /// The cached outcome of `node`: `None` if it was never evaluated,
    /// `Some(None)` if it was evaluated and has no value.
    pub fn cached(&self, node: ConstNode) -> Option<&Option<TypedValue>> {
        self.values.get(&node)
    }

    pub fn stats(&self, node: ConstNode) -> NodeStats {
        self.stats.get(&node).copied().unwrap_or_default()
    }

    fn evaluate_node(
        &mut self,
        handler: &Handler,
        node: ConstNode,
        depth: usize,
    ) -> Result<Option<TypedValue>, ErrorEmitted> {
        if let Some(value) = self.values.get(&node) {
            self.stats.entry(node).or_default().cache_hits += 1;
            tracing::trace!(?node, "constant cache hit");
            return Ok(value.clone());
        }
        self.stats.entry(node).or_default().computed += 1;

        let value = match node {
            ConstNode::Declaration(decl) => self.visit_declaration(handler, decl, depth)?,
            ConstNode::Expression(expr) => {
                let expr = self.engines.ee().get(expr);
                self.visit_expression(handler, &expr, depth)?
            }
        };
        tracing::trace!(?node, ?value, depth, "constant evaluated");
        self.values.insert(node, value.clone());
        Ok(value)
    }

    fn visit_declaration(
        &mut self,
        handler: &Handler,
        decl_id: VariableId,
        depth: usize,
    ) -> Result<Option<TypedValue>, ErrorEmitted> {
        let decl = self.engines.de().get_variable(&decl_id);
        if !decl.is_constant {
            return Ok(None);
        }
        let (Some(value), Some(type_id)) = (decl.value, decl.type_id) else {
            return Ok(None);
        };

        let depth = depth + 1;
        if depth > MAX_CONSTANT_RECURSION_DEPTH {
            return Err(handler.emit_err(CompileError::CyclicConstantDefinition {
                span: decl.span.clone(),
            }));
        }
        let value = self.evaluate_node(handler, ConstNode::Expression(value), depth)?;
        Ok(narrow_opt(self.engines, value, type_id))
    }

    fn visit_expression(
        &mut self,
        handler: &Handler,
        expr: &Expression,
        depth: usize,
    ) -> Result<Option<TypedValue>, ErrorEmitted> {
        match &expr.kind {
            ExpressionKind::Literal(literal) => {
                let te = self.engines.te();
                Ok(te.for_literal(literal).and_then(|type_id| {
                    te.get(type_id)
                        .as_rational()
                        .map(|value| TypedValue { type_id, value })
                }))
            }
            ExpressionKind::Identifier {
                referenced_declaration: Some(ReferencedDeclaration::Variable(decl)),
                ..
            } if self.engines.de().get_variable(decl).is_constant => {
                self.evaluate_node(handler, ConstNode::Declaration(*decl), depth)
            }
            ExpressionKind::UnaryOp { op, operand } => {
                self.visit_unary_op(handler, expr, *op, *operand, depth)
            }
            ExpressionKind::BinaryOp { op, lhs, rhs } => {
                self.visit_binary_op(handler, expr, *op, *lhs, *rhs, depth)
            }
            ExpressionKind::Tuple {
                components,
                is_inline_array: false,
            } => match components.as_slice() {
                [Some(component)] => {
                    self.evaluate_node(handler, ConstNode::Expression(*component), depth)
                }
                _ => Ok(None),
            },
            ExpressionKind::Identifier { .. }
            | ExpressionKind::Tuple { .. }
            | ExpressionKind::Opaque => Ok(None),
        }
    }

    fn visit_unary_op(
        &mut self,
        handler: &Handler,
        expr: &Expression,
        op: UnaryOperator,
        operand: ExpressionId,
        depth: usize,
    ) -> Result<Option<TypedValue>, ErrorEmitted> {
        let Some(operand) = self.evaluate_node(handler, ConstNode::Expression(operand), depth)? else {
            return Ok(None);
        };
        let Some(result_type) = self.engines.te().unary_operator_result(operand.type_id, op) else {
            return Ok(None);
        };
        let Some(operand) = narrow(self.engines, operand.value, result_type) else {
            return Ok(None);
        };
        let Some(result) = evaluate_unary_operator(op, &operand.value) else {
            return Ok(None);
        };
        match narrow(self.engines, result, result_type) {
            Some(value) => Ok(Some(value)),
            None => Err(handler.emit_err(CompileError::ConstantArithmeticError {
                span: expr.span.clone(),
            })),
        }
    }

    fn visit_binary_op(
        &mut self,
        handler: &Handler,
        expr: &Expression,
        op: BinaryOperator,
        lhs: ExpressionId,
        rhs: ExpressionId,
        depth: usize,
    ) -> Result<Option<TypedValue>, ErrorEmitted> {
        let left = self.evaluate_node(handler, ConstNode::Expression(lhs), depth)?;
        let right = self.evaluate_node(handler, ConstNode::Expression(rhs), depth)?;
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(None);
        };
        // Comparisons fold to booleans, which are not rational constants.
        if op.is_compare_op() {
            return Ok(None);
        }

        let Some(result_type) =
            self.engines
                .te()
                .binary_operator_result(left.type_id, op, right.type_id)
        else {
            return Err(handler.emit_err(CompileError::OperatorNotCompatibleWithTypes {
                op: op.to_string(),
                lhs_type: self.engines.help_out(left.type_id).to_string(),
                rhs_type: self.engines.help_out(right.type_id).to_string(),
                span: expr.span.clone(),
            }));
        };

        let (Some(left), Some(right)) = (
            narrow(self.engines, left.value, result_type),
            narrow(self.engines, right.value, result_type),
        ) else {
            return Ok(None);
        };
        let Some(result) = evaluate_binary_operator(op, &left.value, &right.value) else {
            return Ok(None);
        };
        match narrow(self.engines, result, result_type) {
            Some(value) => Ok(Some(value)),
            None => Err(handler.emit_err(CompileError::ConstantArithmeticError {
                span: expr.span.clone(),
            })),
        }
    }
}
