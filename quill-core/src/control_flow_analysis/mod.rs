//! Per-function control flow checks: reads of variables that may not have
//! been assigned, and code that can never execute.

mod analyzer;
mod flow_graph;
mod uninitialized_access;
mod unreachable_code;

pub use analyzer::ControlFlowAnalyzer;
pub use flow_graph::{
    ControlFlowGraph, FlowEdge, FlowNode, FunctionFlow, Graph, OccurrenceRef, VariableOccurrence,
    VariableOccurrenceKind,
};
