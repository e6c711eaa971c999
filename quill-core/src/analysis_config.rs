use serde::{Deserialize, Serialize};

/// Switches for the control-flow checks run by
/// [ControlFlowAnalyzer](crate::control_flow_analysis::ControlFlowAnalyzer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    pub(crate) check_uninitialized_access: bool,
    pub(crate) check_unreachable_code: bool,
    /// Dump each analyzed flow graph as GraphViz DOT through `tracing`.
    pub(crate) print_flow_graph: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            check_uninitialized_access: true,
            check_unreachable_code: true,
            print_flow_graph: false,
        }
    }
}

impl AnalysisConfig {
    pub fn check_uninitialized_access(self, a: bool) -> Self {
        Self {
            check_uninitialized_access: a,
            ..self
        }
    }

    pub fn check_unreachable_code(self, a: bool) -> Self {
        Self {
            check_unreachable_code: a,
            ..self
        }
    }

    pub fn print_flow_graph(self, a: bool) -> Self {
        Self {
            print_flow_graph: a,
            ..self
        }
    }

    pub fn checks_uninitialized_access(&self) -> bool {
        self.check_uninitialized_access
    }

    pub fn checks_unreachable_code(&self) -> bool {
        self.check_unreachable_code
    }

    pub fn prints_flow_graph(&self) -> bool {
        self.print_flow_graph
    }
}
