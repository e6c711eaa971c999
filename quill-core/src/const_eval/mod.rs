//! Compile-time evaluation of constant expressions to exact rationals.

mod evaluator;
mod operators;
mod precision;

pub use evaluator::*;
pub use operators::*;
pub use precision::*;

use quill_error::handler::{ErrorEmitted, Handler};
use quill_types::Rational;

use crate::{
    engine_threading::Engines,
    language::ty::ExpressionId,
    type_system::{TypeId, TypeInfo},
};

/// A constant value committed to a type it fits in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedValue {
    pub type_id: TypeId,
    pub value: Rational,
}

/// Evaluates `expr` with a fresh cache.
///
/// `Ok(None)` means the expression is not a usable constant. `Err` means a
/// fatal diagnostic was emitted to `handler`.
pub fn evaluate(
    handler: &Handler,
    engines: &Engines,
    expr: ExpressionId,
) -> Result<Option<TypedValue>, ErrorEmitted> {
    ConstantEvaluator::new(engines).evaluate(handler, expr)
}

/// Commits `value` to `target`.
///
/// Rational targets accept anything and are re-typed to carry `value`.
/// Integer targets accept values within their bounds and truncate fractions
/// toward zero. Every other target fails.
pub fn narrow(engines: &Engines, value: Rational, target: TypeId) -> Option<TypedValue> {
    let te = engines.te();
    match &*te.get(target) {
        TypeInfo::RationalNumber(_) => Some(TypedValue {
            type_id: te.insert_rational(value.clone()),
            value,
        }),
        TypeInfo::Integer(integer) if integer.fits(&value) => Some(TypedValue {
            type_id: target,
            value: Rational::from_integer(value.trunc()),
        }),
        _ => None,
    }
}

/// [narrow] for a value that may be absent. `target` is not inspected when
/// `value` is `None`.
pub fn narrow_opt(engines: &Engines, value: Option<TypedValue>, target: TypeId) -> Option<TypedValue> {
    value.and_then(|typed| narrow(engines, typed.value, target))
}
