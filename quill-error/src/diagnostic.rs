use quill_types::{SourceEngine, Span};

/// A compile error or warning, prepared for rendering: a coded reason, the
/// primary issue, secondary hints and free-form help lines.
#[derive(Debug)]
pub struct Diagnostic {
    pub reason: Reason,
    pub issue: Issue,
    pub hints: Vec<Hint>,
    pub help: Vec<String>,
    /// Fatal diagnostics halt the stage that emitted them.
    pub fatal: bool,
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match (self.issue.label_type, self.fatal) {
            (LabelType::Error, true) => Level::FatalError,
            (LabelType::Error, false) => Level::Error,
            (LabelType::Warning, _) => Level::Warning,
            (LabelType::Info, _) => Level::Info,
        }
    }

    pub fn code(&self) -> &str {
        self.reason.code.as_str()
    }

    /// The issue and every hint that points into a known source file.
    pub fn labels(&self) -> Vec<&Label> {
        std::iter::once(&*self.issue)
            .chain(self.hints.iter().map(|hint| &**hint))
            .filter(|label| label.is_in_source())
            .collect()
    }

    pub fn help(&self) -> impl Iterator<Item = &String> + '_ {
        self.help.iter().filter(|help| !help.is_empty())
    }

    /// Distinct source files the issue and its hints refer to, in label order.
    pub fn related_sources(&self) -> Vec<&SourcePath> {
        let mut source_files = vec![];
        for file in self.labels().into_iter().filter_map(Label::source_path) {
            if !source_files.contains(&file) {
                source_files.push(file);
            }
        }
        source_files
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    FatalError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelType {
    Info,
    Warning,
    Error,
}

/// A message attached to a span. Spans whose source is not registered with
/// the [SourceEngine] produce labels that are kept but never shown.
#[derive(Debug)]
pub struct Label {
    label_type: LabelType,
    span: Span,
    text: String,
    source_path: Option<SourcePath>,
}

impl Label {
    fn new(source_engine: &SourceEngine, label_type: LabelType, span: Span, text: String) -> Label {
        let source_path = span
            .source_id()
            .and_then(|id| source_engine.get_path(id))
            .map(|path| SourcePath(path.to_string_lossy().to_string()));
        Label {
            label_type,
            span,
            text,
            source_path,
        }
    }

    pub fn is_in_source(&self) -> bool {
        self.source_path.is_some() && self.span.start() < self.span.end()
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_path(&self) -> Option<&SourcePath> {
        self.source_path.as_ref()
    }
}

#[derive(Debug)]
pub struct Issue(Label);

impl Issue {
    pub fn warning(source_engine: &SourceEngine, span: Span, text: String) -> Self {
        Issue(Label::new(source_engine, LabelType::Warning, span, text))
    }

    pub fn error(source_engine: &SourceEngine, span: Span, text: String) -> Self {
        Issue(Label::new(source_engine, LabelType::Error, span, text))
    }
}

impl std::ops::Deref for Issue {
    type Target = Label;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A secondary location, e.g. where a variable was declared.
#[derive(Debug)]
pub struct Hint(Label);

impl Hint {
    pub fn info(source_engine: &SourceEngine, span: Span, text: String) -> Self {
        Hint(Label::new(source_engine, LabelType::Info, span, text))
    }
}

impl std::ops::Deref for Hint {
    type Target = Label;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath(String);

impl SourcePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Code prefixes keep numbers unique per analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiagnosticArea {
    TypeChecking,
    ConstantEvaluation,
    ControlFlowAnalysis,
    Warnings,
}

impl DiagnosticArea {
    fn prefix(&self) -> &'static str {
        match self {
            Self::TypeChecking => "E3",
            Self::ConstantEvaluation => "E4",
            Self::ControlFlowAnalysis => "E5",
            Self::Warnings => "W0",
        }
    }
}

/// A stable diagnostic code such as `E4001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(String);

impl Code {
    pub fn type_checking(number: u16) -> Code {
        Self::new(DiagnosticArea::TypeChecking, number)
    }

    pub fn constant_evaluation(number: u16) -> Code {
        Self::new(DiagnosticArea::ConstantEvaluation, number)
    }

    pub fn control_flow_analysis(number: u16) -> Code {
        Self::new(DiagnosticArea::ControlFlowAnalysis, number)
    }

    pub fn warnings(number: u16) -> Code {
        Self::new(DiagnosticArea::Warnings, number)
    }

    fn new(area: DiagnosticArea, number: u16) -> Self {
        debug_assert!(0 < number && number < 999, "code numbers are in 1..999");
        Code(format!("{}{:03}", area.prefix(), number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reason {
    code: Code,
    description: String,
}

impl Reason {
    pub fn new(code: Code, description: String) -> Self {
        Self { code, description }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

pub trait ToDiagnostic {
    fn to_diagnostic(&self, source_engine: &SourceEngine) -> Diagnostic;
}
