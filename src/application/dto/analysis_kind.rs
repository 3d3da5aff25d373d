/// Kind of analysis requested for a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    /// Full transitive dependency graph
    Stack,
    /// Direct dependencies of the root only
    Component,
}

impl AnalysisKind {
    pub fn is_transitive(self) -> bool {
        matches!(self, AnalysisKind::Stack)
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stack" => Ok(AnalysisKind::Stack),
            "component" => Ok(AnalysisKind::Component),
            _ => Err(format!(
                "Invalid analysis kind: {}. Please specify 'stack' or 'component'",
                s
            )),
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisKind::Stack => write!(f, "stack"),
            AnalysisKind::Component => write!(f, "component"),
        }
    }
}
