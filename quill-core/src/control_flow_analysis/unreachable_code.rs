//! Detection of code that can never execute.

use std::collections::BTreeSet;

use petgraph::visit::{Bfs, Reversed, VisitMap};
use quill_types::Span;

use super::flow_graph::FunctionFlow;

/// Spans of nodes that lie on some path to a sink but are not reachable from
/// the entry, merged into maximal contiguous ranges and sorted.
///
/// Walking backward from every sink (normal exit, revert and transaction
/// return) keeps code after an unconditional revert from being missed.
pub(crate) fn find_unreachable_spans(flow: &FunctionFlow) -> Vec<Span> {
    let graph = flow.graph();

    let mut forward = Bfs::new(graph, flow.entry());
    while forward.next(graph).is_some() {}
    let reachable = forward.discovered;

    let reversed = Reversed(graph);
    let mut backward = Bfs::new(reversed, flow.exit());
    for sink in [flow.revert(), flow.transaction_return()] {
        if backward.discovered.visit(sink) {
            backward.stack.push_back(sink);
        }
    }

    let mut unreachable = BTreeSet::new();
    while let Some(node) = backward.next(reversed) {
        if reachable.is_visited(&node) {
            continue;
        }
        if let Some(span) = &graph[node].span {
            unreachable.insert(span.clone());
        }
    }

    let mut merged: Vec<Span> = vec![];
    for span in unreachable {
        match merged.last_mut() {
            Some(current) if current.is_same_source(&span) && span.start() <= current.end() => {
                *current = Span::join(current.clone(), &span);
            }
            _ => merged.push(span),
        }
    }
    merged
}
