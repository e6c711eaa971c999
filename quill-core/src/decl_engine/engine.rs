use std::sync::Arc;

use crate::{
    concurrent_slab::ConcurrentSlab,
    decl_engine::DeclId,
    language::ty::{ContractDeclaration, FunctionDeclaration, VariableDeclaration},
};

/// Used inside of type inference to store declarations.
#[derive(Debug, Default)]
pub struct DeclEngine {
    variable_slab: ConcurrentSlab<VariableDeclaration>,
    function_slab: ConcurrentSlab<FunctionDeclaration>,
    contract_slab: ConcurrentSlab<ContractDeclaration>,
}

pub trait DeclEngineGet<I, U> {
    fn get(&self, index: &I) -> Arc<U>;
}

pub trait DeclEngineInsert<T> {
    fn insert(&self, decl: T) -> DeclId<T>;
}

pub trait DeclEngineReplace<T> {
    fn replace(&self, index: DeclId<T>, decl: T);
}

macro_rules! decl_engine_get {
    ($slab:ident, $decl:ty) => {
        impl DeclEngineGet<DeclId<$decl>, $decl> for DeclEngine {
            fn get(&self, index: &DeclId<$decl>) -> Arc<$decl> {
                self.$slab.get(index.inner())
            }
        }
    };
}
decl_engine_get!(variable_slab, VariableDeclaration);
decl_engine_get!(function_slab, FunctionDeclaration);
decl_engine_get!(contract_slab, ContractDeclaration);

macro_rules! decl_engine_insert {
    ($slab:ident, $decl:ty) => {
        impl DeclEngineInsert<$decl> for DeclEngine {
            fn insert(&self, decl: $decl) -> DeclId<$decl> {
                DeclId::new(self.$slab.insert(decl))
            }
        }
    };
}
decl_engine_insert!(variable_slab, VariableDeclaration);
decl_engine_insert!(function_slab, FunctionDeclaration);
decl_engine_insert!(contract_slab, ContractDeclaration);

macro_rules! decl_engine_replace {
    ($slab:ident, $decl:ty) => {
        impl DeclEngineReplace<$decl> for DeclEngine {
            fn replace(&self, index: DeclId<$decl>, decl: $decl) {
                self.$slab.replace(index.inner(), decl);
            }
        }
    };
}
decl_engine_replace!(variable_slab, VariableDeclaration);
decl_engine_replace!(function_slab, FunctionDeclaration);
decl_engine_replace!(contract_slab, ContractDeclaration);

impl DeclEngine {
    pub fn get_variable(&self, index: &DeclId<VariableDeclaration>) -> Arc<VariableDeclaration> {
        self.get(index)
    }

    pub fn get_function(&self, index: &DeclId<FunctionDeclaration>) -> Arc<FunctionDeclaration> {
        self.get(index)
    }

    pub fn get_contract(&self, index: &DeclId<ContractDeclaration>) -> Arc<ContractDeclaration> {
        self.get(index)
    }
}
