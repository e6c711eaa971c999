use std::sync::{Arc, RwLock};

use num_traits::Signed;
use quill_types::{IntegerBits, Rational};
use rustc_hash::FxHashMap;

use crate::{
    concurrent_slab::ConcurrentSlab,
    const_eval::{evaluate_binary_operator, evaluate_unary_operator},
    language::{BinaryOperator, Literal, UnaryOperator},
    type_system::{parse_number_literal, DataLocation, IntegerType, TypeId, TypeInfo},
};

/// Interns [TypeInfo]s: inserting an equal type twice yields the same [TypeId].
#[derive(Debug, Default)]
pub struct TypeEngine {
    slab: ConcurrentSlab<TypeInfo>,
    id_map: RwLock<FxHashMap<TypeInfo, TypeId>>,
}

impl TypeEngine {
    pub fn insert(&self, ty: TypeInfo) -> TypeId {
        if let Some(id) = self.id_map.read().unwrap().get(&ty) {
            return *id;
        }
        let mut id_map = self.id_map.write().unwrap();
        if let Some(id) = id_map.get(&ty) {
            return *id;
        }
        let id = TypeId::new(self.slab.insert(ty.clone()));
        id_map.insert(ty, id);
        id
    }

    pub fn get(&self, id: TypeId) -> Arc<TypeInfo> {
        self.slab.get(id.index())
    }

    pub fn insert_rational(&self, value: Rational) -> TypeId {
        self.insert(TypeInfo::RationalNumber(value))
    }

    pub fn insert_integer(&self, signed: bool, bits: IntegerBits) -> TypeId {
        self.insert(TypeInfo::Integer(IntegerType { signed, bits }))
    }

    /// The natural type of a literal. Malformed number literals have none.
    pub fn for_literal(&self, literal: &Literal) -> Option<TypeId> {
        let ty = match literal {
            Literal::Bool(_) => TypeInfo::Boolean,
            Literal::String(value) => TypeInfo::StringLiteral(value.clone()),
            Literal::Number {
                value,
                sub_denomination,
            } => TypeInfo::RationalNumber(parse_number_literal(value, *sub_denomination)?),
        };
        Some(self.insert(ty))
    }

    /// Whether values of `id` are references into `location`.
    pub fn data_stored_in(&self, id: TypeId, location: DataLocation) -> bool {
        self.get(id).data_location() == Some(location)
    }

    /// The type of `op operand`, or `None` if the operator does not apply.
    pub fn unary_operator_result(&self, operand: TypeId, op: UnaryOperator) -> Option<TypeId> {
        match &*self.get(operand) {
            TypeInfo::RationalNumber(value) => {
                evaluate_unary_operator(op, value).map(|result| self.insert_rational(result))
            }
            TypeInfo::Integer(integer) => match op {
                UnaryOperator::BitNot | UnaryOperator::Inc | UnaryOperator::Dec => Some(operand),
                UnaryOperator::Sub if integer.signed => Some(operand),
                _ => None,
            },
            TypeInfo::Boolean if op == UnaryOperator::Not => Some(operand),
            _ => None,
        }
    }

    /// The type of `lhs op rhs`, or `None` if the operand types are incompatible
    /// with the operator.
    pub fn binary_operator_result(
        &self,
        lhs: TypeId,
        op: BinaryOperator,
        rhs: TypeId,
    ) -> Option<TypeId> {
        use TypeInfo::*;
        let boolean = || self.insert(Boolean);
        match (&*self.get(lhs), &*self.get(rhs)) {
            (RationalNumber(l), RationalNumber(r)) => {
                if op.is_compare_op() {
                    return Some(boolean());
                }
                evaluate_binary_operator(op, l, r).map(|value| self.insert_rational(value))
            }
            (Integer(integer), RationalNumber(value)) => {
                self.integer_with_rational(lhs, *integer, op, value)
            }
            (RationalNumber(value), Integer(integer)) => {
                if op.is_shift_op() || op == BinaryOperator::Exp {
                    let mobile = mobile_integer_type(value)?;
                    if integer.signed {
                        return None;
                    }
                    return Some(self.insert(Integer(mobile)));
                }
                self.integer_with_rational(rhs, *integer, op, value)
            }
            (Integer(l), Integer(r)) => {
                if op.is_boolean_op() {
                    return None;
                }
                if op.is_shift_op() || op == BinaryOperator::Exp {
                    return (!r.signed).then_some(lhs);
                }
                if l.signed != r.signed {
                    return None;
                }
                if op.is_compare_op() {
                    return Some(boolean());
                }
                Some(if l.bits >= r.bits { lhs } else { rhs })
            }
            (Boolean, Boolean) => {
                use BinaryOperator::{And, Equal, NotEqual, Or};
                matches!(op, And | Or | Equal | NotEqual).then(boolean)
            }
            (Address, Address) => op.is_compare_op().then(boolean),
            _ => None,
        }
    }

    fn integer_with_rational(
        &self,
        integer_id: TypeId,
        integer: IntegerType,
        op: BinaryOperator,
        value: &Rational,
    ) -> Option<TypeId> {
        if !value.is_integer() || op.is_boolean_op() {
            return None;
        }
        if op.is_shift_op() || op == BinaryOperator::Exp {
            return (!value.is_negative()).then_some(integer_id);
        }
        if !integer.fits(value) {
            return None;
        }
        if op.is_compare_op() {
            return Some(self.insert(TypeInfo::Boolean));
        }
        Some(integer_id)
    }
}

/// The smallest integer type able to hold `value`, unsigned when possible.
fn mobile_integer_type(value: &Rational) -> Option<IntegerType> {
    if !value.is_integer() {
        return None;
    }
    let signed = value.numerator().is_negative();
    (8..=256)
        .step_by(8)
        .filter_map(|bits| IntegerBits::new(bits).ok())
        .map(|bits| IntegerType { signed, bits })
        .find(|ty| ty.fits(value))
}
