pub mod analysis_config;
mod concurrent_slab;
pub mod const_eval;
pub mod control_flow_analysis;
pub mod decl_engine;
pub mod engine_threading;
pub mod language;
pub mod type_system;

pub use analysis_config::AnalysisConfig;
pub use const_eval::{evaluate, ConstantEvaluator, TypedValue};
pub use control_flow_analysis::{ControlFlowAnalyzer, ControlFlowGraph, FunctionFlow};
pub use engine_threading::Engines;
