use std::{cmp::Ordering, fmt};

use indexmap::IndexMap;
use petgraph::{graph::EdgeIndex, prelude::NodeIndex, Direction};
use quill_types::{Ident, Span};

use crate::decl_engine::{ContractId, FunctionId, VariableId};

pub type Graph = petgraph::Graph<FlowNode, FlowEdge>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowEdge(String);

impl fmt::Display for FlowEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlowEdge {
    fn from(s: &str) -> Self {
        FlowEdge(s.to_string())
    }
}

/// Ordered so that declarations sort first when two occurrences share a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableOccurrenceKind {
    Declaration,
    Access,
    Return,
    Assignment,
    /// Any use from inline assembly. Treated like an access.
    InlineAssembly,
}

/// One event involving a variable at a flow node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableOccurrence {
    pub declaration: VariableId,
    pub kind: VariableOccurrenceKind,
    pub span: Option<Span>,
}

impl VariableOccurrence {
    pub fn new(declaration: VariableId, kind: VariableOccurrenceKind, span: Option<Span>) -> Self {
        VariableOccurrence {
            declaration,
            kind,
            span,
        }
    }

    pub fn declaration(declaration: VariableId, span: Option<Span>) -> Self {
        Self::new(declaration, VariableOccurrenceKind::Declaration, span)
    }

    pub fn assignment(declaration: VariableId, span: Option<Span>) -> Self {
        Self::new(declaration, VariableOccurrenceKind::Assignment, span)
    }

    pub fn access(declaration: VariableId, span: Option<Span>) -> Self {
        Self::new(declaration, VariableOccurrenceKind::Access, span)
    }

    pub fn return_(declaration: VariableId, span: Option<Span>) -> Self {
        Self::new(declaration, VariableOccurrenceKind::Return, span)
    }

    pub fn inline_assembly(declaration: VariableId, span: Option<Span>) -> Self {
        Self::new(declaration, VariableOccurrenceKind::InlineAssembly, span)
    }
}

/// Occurrences without a location come first, then by location, then by
/// declaration and kind.
impl Ord for VariableOccurrence {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_location = match (&self.span, &other.span) {
            (Some(lhs), Some(rhs)) => lhs.cmp(rhs),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_location.then_with(|| (self.declaration, self.kind).cmp(&(other.declaration, other.kind)))
    }
}

impl PartialOrd for VariableOccurrence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Position of an occurrence inside a [FunctionFlow].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceRef {
    pub node: NodeIndex,
    pub index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct FlowNode {
    pub occurrences: Vec<VariableOccurrence>,
    /// `None` for synthetic nodes that correspond to no source code.
    pub span: Option<Span>,
    synthetic_name: Option<&'static str>,
}

impl FlowNode {
    pub fn new(span: Option<Span>) -> Self {
        FlowNode {
            occurrences: vec![],
            span,
            synthetic_name: None,
        }
    }

    pub fn with_occurrences(span: Option<Span>, occurrences: Vec<VariableOccurrence>) -> Self {
        FlowNode {
            occurrences,
            span,
            synthetic_name: None,
        }
    }

    fn synthetic(name: &'static str) -> Self {
        FlowNode {
            synthetic_name: Some(name),
            ..FlowNode::default()
        }
    }
}

impl fmt::Display for FlowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.synthetic_name, &self.span) {
            (Some(name), _) => f.write_str(name),
            (None, Some(span)) => f.write_str(span.as_str()),
            (None, None) => write!(f, "<{} occurrences>", self.occurrences.len()),
        }
    }
}

/// The control flow graph of one function body.
///
/// Four synthetic nodes are created up front: `entry`, `exit` (normal
/// return), `revert` and `transaction_return` (execution stops without
/// returning to the caller).
#[derive(Clone, Debug)]
pub struct FunctionFlow {
    pub(crate) graph: Graph,
    entry: NodeIndex,
    exit: NodeIndex,
    revert: NodeIndex,
    transaction_return: NodeIndex,
}

impl Default for FunctionFlow {
    fn default() -> Self {
        FunctionFlow::new()
    }
}

impl FunctionFlow {
    pub fn new() -> Self {
        let mut graph = Graph::new();
        let entry = graph.add_node(FlowNode::synthetic("entry"));
        let exit = graph.add_node(FlowNode::synthetic("exit"));
        let revert = graph.add_node(FlowNode::synthetic("revert"));
        let transaction_return = graph.add_node(FlowNode::synthetic("transaction return"));
        FunctionFlow {
            graph,
            entry,
            exit,
            revert,
            transaction_return,
        }
    }

    pub fn entry(&self) -> NodeIndex {
        self.entry
    }

    pub fn exit(&self) -> NodeIndex {
        self.exit
    }

    pub fn revert(&self) -> NodeIndex {
        self.revert
    }

    pub fn transaction_return(&self) -> NodeIndex {
        self.transaction_return
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn add_node(&mut self, node: FlowNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> EdgeIndex {
        self.graph.add_edge(from, to, FlowEdge::default())
    }

    pub fn add_labeled_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        label: impl Into<FlowEdge>,
    ) -> EdgeIndex {
        self.graph.add_edge(from, to, label.into())
    }

    pub fn node(&self, index: NodeIndex) -> &FlowNode {
        &self.graph[index]
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> &mut FlowNode {
        &mut self.graph[index]
    }

    /// Successors of `index`.
    pub fn exits(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(index, Direction::Outgoing)
    }

    /// Predecessors of `index`.
    pub fn entries(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(index, Direction::Incoming)
    }

    /// `None` if `occurrence` does not point into this flow.
    pub fn occurrence(&self, occurrence: OccurrenceRef) -> Option<&VariableOccurrence> {
        self.graph
            .node_weight(occurrence.node)?
            .occurrences
            .get(occurrence.index)
    }

    pub(crate) fn visualize(&self, function_name: &Ident) {
        use petgraph::dot::{Config, Dot};
        tracing::info!(
            "flow graph of \"{function_name}\":\n{}",
            Dot::with_config(&self.graph, &[Config::EdgeNoLabel])
        );
    }
}

/// Every function flow of a program, keyed by function and by the contract
/// it is analyzed for. An inherited function appears once per derived
/// contract.
#[derive(Clone, Debug, Default)]
pub struct ControlFlowGraph {
    function_flows: IndexMap<(FunctionId, Option<ContractId>), FunctionFlow>,
}

impl ControlFlowGraph {
    /// Registers `flow`, returning the flow it replaced, if any.
    pub fn add_function_flow(
        &mut self,
        function: FunctionId,
        contract: Option<ContractId>,
        flow: FunctionFlow,
    ) -> Option<FunctionFlow> {
        self.function_flows.insert((function, contract), flow)
    }

    pub fn function_flow(
        &self,
        function: FunctionId,
        contract: Option<ContractId>,
    ) -> Option<&FunctionFlow> {
        self.function_flows.get(&(function, contract))
    }

    /// All flows in registration order.
    pub fn function_flows(
        &self,
    ) -> impl Iterator<Item = (FunctionId, Option<ContractId>, &FunctionFlow)> + '_ {
        self.function_flows
            .iter()
            .map(|((function, contract), flow)| (*function, *contract, flow))
    }

    pub fn len(&self) -> usize {
        self.function_flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.function_flows.is_empty()
    }
}
