use quill_error::{
    error::CompileError,
    handler::{ErrorEmitted, Handler},
    warning::{CompileWarning, Warning},
};
use quill_types::{Named, Span, Spanned};
use rustc_hash::FxHashSet;

use super::{
    flow_graph::{ControlFlowGraph, FunctionFlow, VariableOccurrenceKind},
    uninitialized_access::find_uninitialized_accesses,
    unreachable_code::find_unreachable_spans,
};
use crate::{
    analysis_config::AnalysisConfig,
    decl_engine::{ContractId, FunctionId, VariableId},
    engine_threading::Engines,
    language::ty::FunctionDeclaration,
};

/// Runs the per-function control flow checks and reports their findings.
///
/// Warnings already reported by this analyzer are not reported again, so
/// analyzing the same function twice is harmless.
pub struct ControlFlowAnalyzer<'eng> {
    engines: &'eng Engines,
    config: AnalysisConfig,
    unassigned_return_vars_already_warned_for: FxHashSet<VariableId>,
    unreachable_locations_already_warned_for: FxHashSet<Span>,
}

impl<'eng> ControlFlowAnalyzer<'eng> {
    pub fn new(engines: &'eng Engines, config: AnalysisConfig) -> Self {
        ControlFlowAnalyzer {
            engines,
            config,
            unassigned_return_vars_already_warned_for: FxHashSet::default(),
            unreachable_locations_already_warned_for: FxHashSet::default(),
        }
    }

    /// Analyzes every flow of `cfg` in registration order.
    pub fn run(&mut self, handler: &Handler, cfg: &ControlFlowGraph) -> Result<(), ErrorEmitted> {
        handler.scope(|handler| {
            for (function, contract, flow) in cfg.function_flows() {
                self.analyze(handler, function, contract, flow);
            }
            Ok(())
        })
    }

    /// Analyzes the flow of `function`. `most_derived_contract` is the
    /// contract the function is being analyzed for, which differs from the
    /// function's own contract when it is inherited.
    pub fn analyze(
        &mut self,
        handler: &Handler,
        function: FunctionId,
        most_derived_contract: Option<ContractId>,
        flow: &FunctionFlow,
    ) {
        let decl = self.engines.de().get_function(&function);
        if !decl.is_implemented() {
            return;
        }
        if self.config.prints_flow_graph() {
            flow.visualize(decl.name());
        }

        if self.config.checks_uninitialized_access() {
            self.check_uninitialized_access(handler, &decl, most_derived_contract, flow);
        }
        if self.config.checks_unreachable_code() {
            self.check_unreachable_code(handler, flow);
        }
        tracing::debug!(
            function = decl.name().as_str(),
            nodes = flow.graph().node_count(),
            errors = handler.has_errors(),
            "analyzed control flow"
        );
    }

    fn check_uninitialized_access(
        &mut self,
        handler: &Handler,
        function: &FunctionDeclaration,
        most_derived_contract: Option<ContractId>,
        flow: &FunctionFlow,
    ) {
        let has_statements = function
            .body
            .as_ref()
            .is_some_and(|body| !body.is_empty());

        for occurrence_ref in find_uninitialized_accesses(flow) {
            let Some(occurrence) = flow.occurrence(occurrence_ref) else {
                continue;
            };
            let variable = self.engines.de().get_variable(&occurrence.declaration);
            let pointer_location = variable.type_id.and_then(|type_id| {
                self.engines
                    .te()
                    .get(type_id)
                    .data_location()
                    .and_then(|location| location.as_pointer_location())
            });

            if let Some(location) = pointer_location {
                handler.emit_err(CompileError::UninitializedPointerAccess {
                    location,
                    is_return: occurrence.kind == VariableOccurrenceKind::Return,
                    span: occurrence
                        .span
                        .clone()
                        .unwrap_or_else(|| variable.span()),
                    declaration_span: occurrence.span.as_ref().map(|_| variable.span()),
                });
            } else if has_statements
                && variable.is_unnamed()
                && self
                    .unassigned_return_vars_already_warned_for
                    .insert(occurrence.declaration)
            {
                let most_derived_contract = most_derived_contract
                    .filter(|contract| Some(*contract) != function.contract)
                    .map(|contract| self.engines.de().get_contract(&contract).name().clone());
                handler.emit_warn(CompileWarning {
                    span: variable.span(),
                    warning_content: Warning::UnassignedUnnamedReturnVariable {
                        most_derived_contract,
                    },
                });
            }
        }
    }

    fn check_unreachable_code(&mut self, handler: &Handler, flow: &FunctionFlow) {
        for span in find_unreachable_spans(flow) {
            if self
                .unreachable_locations_already_warned_for
                .insert(span.clone())
            {
                handler.emit_warn(CompileWarning {
                    span,
                    warning_content: Warning::UnreachableCode,
                });
            }
        }
    }
}
