use serde::Serialize;

/// A decoded JUnit test suite report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    /// Header total, trusted as authoritative
    pub total_tests: u32,
    pub total_failures: u32,
    pub total_errors: u32,
    /// Producer timestamp, kept verbatim
    pub timestamp: Option<String>,
    pub hostname: Option<String>,
    pub duration_seconds: f64,
    pub cases: Vec<Case>,
}

/// A single test case within a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub name: String,
    pub classname: String,
    pub duration_seconds: f64,
    pub failure: Option<Failure>,
    /// True iff the case carries a `<skipped/>` marker
    pub skipped: bool,
}

impl Case {
    /// A case with a failure element fails, whatever its skip marker says
    pub fn is_failing(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub kind: String,
    pub message: String,
}
