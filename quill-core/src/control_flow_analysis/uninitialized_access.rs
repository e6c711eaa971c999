//! Forward "may be unassigned" dataflow over a [FunctionFlow].

use std::collections::BTreeSet;

use petgraph::prelude::NodeIndex;
use rustc_hash::FxHashMap;

use super::flow_graph::{FunctionFlow, OccurrenceRef, VariableOccurrenceKind};
use crate::decl_engine::VariableId;

#[derive(Clone, Debug, Default)]
struct NodeInfo {
    unassigned_variables_at_entry: BTreeSet<VariableId>,
    unassigned_variables_at_exit: BTreeSet<VariableId>,
    uninitialized_variable_accesses: BTreeSet<OccurrenceRef>,
}

impl NodeInfo {
    /// Unions a predecessor's exit state into this node's entry state.
    /// Returns whether anything was added.
    fn propagate_from(
        &mut self,
        unassigned_at_exit: &BTreeSet<VariableId>,
        uninitialized_accesses: &BTreeSet<OccurrenceRef>,
    ) -> bool {
        let previous = (
            self.unassigned_variables_at_entry.len(),
            self.uninitialized_variable_accesses.len(),
        );
        self.unassigned_variables_at_entry
            .extend(unassigned_at_exit.iter().copied());
        self.uninitialized_variable_accesses
            .extend(uninitialized_accesses.iter().copied());
        previous
            != (
                self.unassigned_variables_at_entry.len(),
                self.uninitialized_variable_accesses.len(),
            )
    }
}

/// Returns every access, return or inline assembly use that may read a
/// variable before it is assigned on some path reaching the function exit.
///
/// The result is sorted by [VariableOccurrence](super::flow_graph::VariableOccurrence)
/// order. Facts only grow, so the work-list loop terminates.
pub(crate) fn find_uninitialized_accesses(flow: &FunctionFlow) -> Vec<OccurrenceRef> {
    let mut node_infos: FxHashMap<NodeIndex, NodeInfo> = FxHashMap::default();
    let mut nodes_to_traverse = BTreeSet::from([flow.entry()]);
    let mut iterations = 0usize;

    while let Some(current) = nodes_to_traverse.pop_first() {
        iterations += 1;
        let node_info = node_infos.entry(current).or_default();
        let mut unassigned = node_info.unassigned_variables_at_entry.clone();

        for (index, occurrence) in flow.node(current).occurrences.iter().enumerate() {
            match occurrence.kind {
                VariableOccurrenceKind::Declaration => {
                    unassigned.insert(occurrence.declaration);
                }
                VariableOccurrenceKind::Assignment => {
                    unassigned.remove(&occurrence.declaration);
                }
                VariableOccurrenceKind::Access
                | VariableOccurrenceKind::Return
                | VariableOccurrenceKind::InlineAssembly => {
                    if unassigned.contains(&occurrence.declaration) {
                        node_info
                            .uninitialized_variable_accesses
                            .insert(OccurrenceRef {
                                node: current,
                                index,
                            });
                    }
                }
            }
        }
        node_info.unassigned_variables_at_exit = unassigned;

        let unassigned_at_exit = node_info.unassigned_variables_at_exit.clone();
        let uninitialized_accesses = node_info.uninitialized_variable_accesses.clone();
        for successor in flow.exits(current) {
            let is_new = !node_infos.contains_key(&successor);
            let changed = node_infos
                .entry(successor)
                .or_default()
                .propagate_from(&unassigned_at_exit, &uninitialized_accesses);
            if is_new || changed {
                nodes_to_traverse.insert(successor);
            }
        }
    }
    tracing::trace!(iterations, nodes = node_infos.len(), "uninitialized access fixpoint");

    let Some(exit_info) = node_infos.get(&flow.exit()) else {
        return vec![];
    };
    let mut accesses: Vec<OccurrenceRef> = exit_info
        .uninitialized_variable_accesses
        .iter()
        .copied()
        .collect();
    accesses.sort_by(|lhs, rhs| {
        flow.occurrence(*lhs)
            .cmp(&flow.occurrence(*rhs))
            .then_with(|| lhs.cmp(rhs))
    });
    accesses
}
