use std::{fmt, hash::Hash, marker::PhantomData};

use crate::language::ty::{ContractDeclaration, FunctionDeclaration, VariableDeclaration};

pub type DeclIdIndexType = usize;

/// An ID used to refer to an item in the [DeclEngine](super::DeclEngine).
pub struct DeclId<T>(DeclIdIndexType, PhantomData<T>);

pub type VariableId = DeclId<VariableDeclaration>;
pub type FunctionId = DeclId<FunctionDeclaration>;
pub type ContractId = DeclId<ContractDeclaration>;

impl<T> DeclId<T> {
    pub(crate) fn new(id: usize) -> Self {
        DeclId(id, PhantomData)
    }

    pub fn inner(&self) -> DeclIdIndexType {
        self.0
    }
}

impl<T> fmt::Debug for DeclId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeclId").field(&self.0).finish()
    }
}

impl<T> fmt::Display for DeclId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> Copy for DeclId<T> {}
impl<T> Clone for DeclId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for DeclId<T> {}
impl<T> Hash for DeclId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}
impl<T> PartialEq for DeclId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<T> PartialOrd for DeclId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for DeclId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// What an identifier resolved to during name resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferencedDeclaration {
    Variable(VariableId),
    Function(FunctionId),
    Contract(ContractId),
}
