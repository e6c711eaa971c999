use std::sync::Arc;

use pretty_assertions::assert_eq;
use quill_core::{
    control_flow_analysis::{FlowNode, VariableOccurrence},
    decl_engine::{ContractId, DeclEngineInsert, FunctionId, VariableId},
    language::ty::{ContractDeclaration, FunctionBody, FunctionDeclaration, VariableDeclaration},
    type_system::{DataLocation, TypeInfo},
    AnalysisConfig, ControlFlowAnalyzer, ControlFlowGraph, Engines, FunctionFlow,
};
use quill_error::{error::CompileError, handler::Handler, warning::Warning};
use quill_types::{Ident, IntegerBits, Span};
use tracing_test::traced_test;

fn find(src: &Arc<str>, needle: &str) -> Span {
    Span::find(src, needle, None).unwrap()
}

fn contract(engines: &Engines, name: &str) -> ContractId {
    engines.de().insert(ContractDeclaration {
        name: Ident::new_no_span(name.to_string()),
        span: Span::dummy(),
    })
}

fn function(engines: &Engines, src: &Arc<str>, contract: Option<ContractId>) -> FunctionId {
    engines.de().insert(FunctionDeclaration {
        name: Ident::new(find(src, "f")),
        contract,
        body: Some(FunctionBody {
            statements: vec![Span::new(src.clone(), 0, src.len(), None).unwrap()],
        }),
        span: Span::new(src.clone(), 0, src.len(), None).unwrap(),
    })
}

fn variable(engines: &Engines, name: Ident, info: TypeInfo, span: Span) -> VariableId {
    engines.de().insert(VariableDeclaration {
        name,
        type_id: Some(engines.te().insert(info)),
        value: None,
        is_constant: false,
        span,
    })
}

/// `function f() returns (S storage p) { if (c) { return p; } else { p = s; } }`
fn storage_pointer_returned_on_one_branch(engines: &Engines) -> (FunctionId, FunctionFlow) {
    let src: Arc<str> = Arc::from(
        "function f() returns (S storage p) { if (c) { return p; } else { p = s; } }",
    );
    let f = function(engines, &src, None);
    let p = variable(
        engines,
        Ident::new_no_span("p".to_string()),
        TypeInfo::Reference {
            name: "S".to_string(),
            location: DataLocation::Storage,
        },
        find(&src, "S storage p"),
    );

    let mut flow = FunctionFlow::new();
    let declare = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "S storage p")),
        vec![VariableOccurrence::declaration(p, None)],
    ));
    let condition = flow.add_node(FlowNode::new(Some(find(&src, "if (c)"))));
    let then_branch = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "return p;")),
        vec![VariableOccurrence::return_(p, Some(find(&src, "return p")))],
    ));
    let else_branch = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "p = s;")),
        vec![VariableOccurrence::assignment(p, Some(find(&src, "p = s")))],
    ));
    flow.add_edge(flow.entry(), declare);
    flow.add_edge(declare, condition);
    flow.add_labeled_edge(condition, then_branch, "true");
    flow.add_labeled_edge(condition, else_branch, "false");
    flow.add_edge(then_branch, flow.exit());
    flow.add_edge(else_branch, flow.exit());
    (f, flow)
}

/// `function f() { revert(); x = 1; }`
fn statement_after_revert(engines: &Engines) -> (FunctionId, FunctionFlow) {
    let src: Arc<str> = Arc::from("function f() { revert(); x = 1; }");
    let f = function(engines, &src, None);

    let mut flow = FunctionFlow::new();
    let revert = flow.add_node(FlowNode::new(Some(find(&src, "revert();"))));
    let assign = flow.add_node(FlowNode::new(Some(find(&src, "x = 1;"))));
    flow.add_edge(flow.entry(), revert);
    flow.add_edge(revert, flow.revert());
    flow.add_edge(assign, flow.exit());
    (f, flow)
}

/// `function f() returns (uint8) { if (c) { return 1; } }`, the unnamed
/// return variable is read by the implicit return at the exit.
fn unnamed_return_on_one_branch(
    engines: &Engines,
    contract: Option<ContractId>,
) -> (FunctionId, FunctionFlow) {
    let src: Arc<str> = Arc::from("function f() returns (uint8) { if (c) { return 1; } }");
    let f = function(engines, &src, contract);
    let ret = variable(
        engines,
        Ident::new_no_span(String::new()),
        TypeInfo::Integer(quill_core::type_system::IntegerType::unsigned(IntegerBits::EIGHT)),
        find(&src, "uint8"),
    );

    let mut flow = FunctionFlow::new();
    let declare = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "uint8")),
        vec![VariableOccurrence::declaration(ret, None)],
    ));
    let condition = flow.add_node(FlowNode::new(Some(find(&src, "if (c)"))));
    let then_branch = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "return 1;")),
        vec![VariableOccurrence::assignment(ret, None)],
    ));
    flow.node_mut(flow.exit())
        .occurrences
        .push(VariableOccurrence::return_(ret, None));
    flow.add_edge(flow.entry(), declare);
    flow.add_edge(declare, condition);
    flow.add_edge(condition, then_branch);
    flow.add_edge(condition, flow.exit());
    flow.add_edge(then_branch, flow.exit());
    (f, flow)
}

#[test]
fn uninitialized_storage_pointer_is_reported_once() {
    let engines = Engines::default();
    let (f, flow) = storage_pointer_returned_on_one_branch(&engines);
    let mut analyzer = ControlFlowAnalyzer::new(&engines, AnalysisConfig::default());

    let handler = Handler::default();
    analyzer.analyze(&handler, f, None, &flow);
    let (errors, warnings) = handler.consume();
    assert!(warnings.is_empty());
    assert_eq!(errors.len(), 1);

    let CompileError::UninitializedPointerAccess {
        is_return,
        span,
        declaration_span,
        ..
    } = &errors[0]
    else {
        panic!("unexpected error: {:?}", errors[0]);
    };
    assert!(*is_return);
    assert_eq!(span.as_str(), "return p");
    assert_eq!(
        declaration_span.as_ref().map(Span::as_str),
        Some("S storage p")
    );
    assert_eq!(
        errors[0].to_string(),
        "This variable is of storage pointer type and can be returned without prior \
         assignment, which would lead to undefined behaviour."
    );
}

#[test]
fn code_after_revert_is_unreachable() {
    let engines = Engines::default();
    let (f, flow) = statement_after_revert(&engines);
    let mut analyzer = ControlFlowAnalyzer::new(&engines, AnalysisConfig::default());

    let handler = Handler::default();
    analyzer.analyze(&handler, f, None, &flow);
    let (errors, warnings) = handler.consume();
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].warning_content, Warning::UnreachableCode);
    assert_eq!(warnings[0].span.as_str(), "x = 1;");
}

#[test]
fn repeated_analysis_warns_once() {
    let engines = Engines::default();
    let (f, flow) = statement_after_revert(&engines);
    let mut analyzer = ControlFlowAnalyzer::new(&engines, AnalysisConfig::default());

    let handler = Handler::default();
    analyzer.analyze(&handler, f, None, &flow);
    analyzer.analyze(&handler, f, None, &flow);
    let (_, warnings) = handler.consume();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn unnamed_return_variable_names_most_derived_contract() {
    let engines = Engines::default();
    let base = contract(&engines, "Base");
    let derived = contract(&engines, "Derived");
    let (f, flow) = unnamed_return_on_one_branch(&engines, Some(base));

    let handler = Handler::default();
    ControlFlowAnalyzer::new(&engines, AnalysisConfig::default())
        .analyze(&handler, f, Some(base), &flow);
    ControlFlowAnalyzer::new(&engines, AnalysisConfig::default())
        .analyze(&handler, f, Some(derived), &flow);
    let (errors, warnings) = handler.consume();
    assert!(errors.is_empty());
    assert_eq!(
        warnings
            .iter()
            .map(|warning| warning.to_friendly_warning_string())
            .collect::<Vec<_>>(),
        vec![
            "Unnamed return variable can remain unassigned. Add an explicit return with \
             value to all non-reverting code paths or name the variable."
                .to_string(),
            "Unnamed return variable can remain unassigned when the function is called when \
             \"Derived\" is the most derived contract. Add an explicit return with value to \
             all non-reverting code paths or name the variable."
                .to_string(),
        ]
    );
    assert_eq!(warnings[0].span.as_str(), "uint8");
}

#[test]
fn unnamed_return_is_warned_once_per_declaration() {
    let engines = Engines::default();
    let base = contract(&engines, "Base");
    let derived = contract(&engines, "Derived");
    let (f, flow) = unnamed_return_on_one_branch(&engines, Some(base));
    let mut analyzer = ControlFlowAnalyzer::new(&engines, AnalysisConfig::default());

    let handler = Handler::default();
    analyzer.analyze(&handler, f, Some(base), &flow);
    analyzer.analyze(&handler, f, Some(derived), &flow);
    let (_, warnings) = handler.consume();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn functions_without_body_are_skipped() {
    let engines = Engines::default();
    let (f, flow) = statement_after_revert(&engines);
    let mut declaration = (*engines.de().get_function(&f)).clone();
    declaration.body = None;
    let unimplemented = engines.de().insert(declaration);

    let handler = Handler::default();
    ControlFlowAnalyzer::new(&engines, AnalysisConfig::default())
        .analyze(&handler, unimplemented, None, &flow);
    assert!(!handler.has_warnings());
    assert!(!handler.has_errors());
}

#[test]
fn disabled_checks_stay_silent() {
    let engines = Engines::default();
    let (pointer_fn, pointer_flow) = storage_pointer_returned_on_one_branch(&engines);
    let (revert_fn, revert_flow) = statement_after_revert(&engines);
    let config = AnalysisConfig::default()
        .check_uninitialized_access(false)
        .check_unreachable_code(false);
    let mut analyzer = ControlFlowAnalyzer::new(&engines, config);

    let handler = Handler::default();
    analyzer.analyze(&handler, pointer_fn, None, &pointer_flow);
    analyzer.analyze(&handler, revert_fn, None, &revert_flow);
    assert!(!handler.has_warnings());
    assert!(!handler.has_errors());
}

#[traced_test]
#[test]
fn run_analyzes_every_registered_flow() {
    let engines = Engines::default();
    let (revert_fn, revert_flow) = statement_after_revert(&engines);
    let (pointer_fn, pointer_flow) = storage_pointer_returned_on_one_branch(&engines);
    let mut cfg = ControlFlowGraph::default();
    cfg.add_function_flow(revert_fn, None, revert_flow);
    cfg.add_function_flow(pointer_fn, None, pointer_flow);
    assert_eq!(cfg.len(), 2);

    let mut analyzer =
        ControlFlowAnalyzer::new(&engines, AnalysisConfig::default().print_flow_graph(true));
    let handler = Handler::default();
    assert!(analyzer.run(&handler, &cfg).is_err());
    // Warnings are not repeated by a second pass; errors are.
    assert!(analyzer.run(&handler, &cfg).is_err());

    let (errors, warnings) = handler.consume();
    assert_eq!(errors.len(), 2);
    assert_eq!(warnings.len(), 1);
    assert!(logs_contain("flow graph of \"f\""));
    assert!(logs_contain("analyzed control flow"));
}

#[test]
fn unnamed_return_warning_points_at_the_declaration() {
    let engines = Engines::default();
    let src: Arc<str> = Arc::from("function f() returns (uint8) { if (c) { return 1; } return; }");
    let f = function(&engines, &src, None);
    let ret = variable(
        &engines,
        Ident::new_no_span(String::new()),
        TypeInfo::Integer(quill_core::type_system::IntegerType::unsigned(IntegerBits::EIGHT)),
        find(&src, "uint8"),
    );

    let mut flow = FunctionFlow::new();
    let declare = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "uint8")),
        vec![VariableOccurrence::declaration(ret, None)],
    ));
    let condition = flow.add_node(FlowNode::new(Some(find(&src, "if (c)"))));
    let then_branch = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "return 1;")),
        vec![VariableOccurrence::assignment(ret, None)],
    ));
    let bare_return = flow.add_node(FlowNode::with_occurrences(
        Some(find(&src, "return;")),
        vec![VariableOccurrence::return_(ret, Some(find(&src, "return;")))],
    ));
    flow.add_edge(flow.entry(), declare);
    flow.add_edge(declare, condition);
    flow.add_edge(condition, then_branch);
    flow.add_edge(condition, bare_return);
    flow.add_edge(then_branch, flow.exit());
    flow.add_edge(bare_return, flow.exit());

    let handler = Handler::default();
    ControlFlowAnalyzer::new(&engines, AnalysisConfig::default()).analyze(&handler, f, None, &flow);
    let (errors, warnings) = handler.consume();
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].span.as_str(), "uint8");
}
