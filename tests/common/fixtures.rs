//! Test fixtures and data builders
//!
//! Provides JUnit reports, multipart bodies and configs for tests.

use std::time::Duration;

use testcrier::config::{Config, SlackConfig, DEFAULT_MAX_UPLOAD_SIZE};
use url::Url;

pub const BOUNDARY: &str = "testcrier-boundary-7MA4YWxkTrZu0gW";

enum CaseKind {
    Passed,
    Skipped,
    Failed { kind: String, message: String },
    FailedAndSkipped,
}

struct CaseSpec {
    name: String,
    kind: CaseKind,
}

/// Builds JUnit XML reports with sensible defaults
pub struct ReportBuilder {
    name: Option<String>,
    tests: Option<u32>,
    failures: Option<u32>,
    errors: u32,
    cases: Vec<CaseSpec>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            name: Some("suite1".to_string()),
            tests: None,
            failures: None,
            errors: 0,
            cases: Vec::new(),
        }
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    /// Header `tests` attribute; defaults to the number of cases
    pub fn with_tests(mut self, tests: u32) -> Self {
        self.tests = Some(tests);
        self
    }

    /// Header `failures` attribute; defaults to the number of failing cases
    pub fn with_failures(mut self, failures: u32) -> Self {
        self.failures = Some(failures);
        self
    }

    pub fn with_errors(mut self, errors: u32) -> Self {
        self.errors = errors;
        self
    }

    pub fn passing(mut self, name: &str) -> Self {
        self.cases.push(CaseSpec {
            name: name.to_string(),
            kind: CaseKind::Passed,
        });
        self
    }

    pub fn skipped(mut self, name: &str) -> Self {
        self.cases.push(CaseSpec {
            name: name.to_string(),
            kind: CaseKind::Skipped,
        });
        self
    }

    pub fn failing(mut self, name: &str, kind: &str, message: &str) -> Self {
        self.cases.push(CaseSpec {
            name: name.to_string(),
            kind: CaseKind::Failed {
                kind: kind.to_string(),
                message: message.to_string(),
            },
        });
        self
    }

    /// A case carrying both a failure and a skip marker
    pub fn failing_and_skipped(mut self, name: &str) -> Self {
        self.cases.push(CaseSpec {
            name: name.to_string(),
            kind: CaseKind::FailedAndSkipped,
        });
        self
    }

    /// Renders the header without `tests`/`failures` when `omit_counts` is set
    fn render(&self, omit_counts: bool) -> String {
        let tests = self.tests.unwrap_or(self.cases.len() as u32);
        let failures = self.failures.unwrap_or(
            self.cases
                .iter()
                .filter(|c| {
                    matches!(
                        c.kind,
                        CaseKind::Failed { .. } | CaseKind::FailedAndSkipped
                    )
                })
                .count() as u32,
        );

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite");
        if let Some(ref name) = self.name {
            xml.push_str(&format!(" name=\"{}\"", name));
        }
        if !omit_counts {
            xml.push_str(&format!(" tests=\"{}\" failures=\"{}\"", tests, failures));
        }
        xml.push_str(&format!(
            " errors=\"{}\" timestamp=\"2024-01-09T12:00:00\" time=\"1.250\" hostname=\"ci-runner\">\n",
            self.errors
        ));

        for case in &self.cases {
            xml.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"pkg.Tests\" time=\"0.010\">",
                case.name
            ));
            match &case.kind {
                CaseKind::Passed => {}
                CaseKind::Skipped => xml.push_str("<skipped/>"),
                CaseKind::Failed { kind, message } => xml.push_str(&format!(
                    "<failure type=\"{}\" message=\"{}\">stack trace</failure>",
                    kind, message
                )),
                CaseKind::FailedAndSkipped => xml.push_str(
                    "<failure type=\"AssertionError\" message=\"boom\"/><skipped/>",
                ),
            }
            xml.push_str("</testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    pub fn build(&self) -> String {
        self.render(false)
    }

    /// Same report without the required count attributes
    pub fn build_without_counts(&self) -> String {
        self.render(true)
    }
}

/// Wraps `content` in a multipart form with a single file field
pub fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"report.xml\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/xml\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Creates a test config
pub fn test_config(default_channel: Option<&str>) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        slack: SlackConfig {
            token: "xoxb-test".to_string(),
            api_url: Url::parse("http://localhost:1/api/").expect("valid url"),
            timeout: Duration::from_secs(2),
        },
        default_channel: default_channel.map(str::to_string),
        max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
    }
}
