use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};
use crate::ingest::report::{Case, Failure, Report};

/// Root `<testsuite>` element as it appears on the wire
#[derive(Debug, Deserialize)]
struct SuiteElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@tests")]
    tests: u32,
    #[serde(rename = "@failures")]
    failures: u32,
    #[serde(rename = "@errors", default)]
    errors: u32,
    #[serde(rename = "@timestamp", default)]
    timestamp: Option<String>,
    #[serde(rename = "@time", default, deserialize_with = "optional_number")]
    time: Option<f64>,
    #[serde(rename = "@hostname", default)]
    hostname: Option<String>,
    #[serde(rename = "testcase", default)]
    testcases: Vec<CaseElement>,
}

#[derive(Debug, Deserialize)]
struct CaseElement {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@classname", default)]
    classname: String,
    #[serde(rename = "@time", default, deserialize_with = "optional_number")]
    time: Option<f64>,
    #[serde(rename = "failure", default)]
    failures: Vec<FailureElement>,
    #[serde(rename = "skipped", default)]
    skip_markers: Vec<SkipMarker>,
}

#[derive(Debug, Deserialize)]
struct FailureElement {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@message", default)]
    message: String,
}

/// `<skipped/>` is presence-only; any attributes or text are ignored
#[derive(Debug, Deserialize)]
struct SkipMarker {}

/// Reads an optional numeric attribute; an empty value counts as absent
fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", value))),
    }
}

/// Rejects documents with more than one root element or stray text after it.
///
/// The serde deserializer stops at the end of the first root and would
/// silently accept whatever follows.
fn ensure_single_root(text: &str) -> AppResult<()> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| AppError::MalformedReport(format!("Invalid report XML: {}", e)))?;

        match event {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(AppError::MalformedReport(
                    "Text content outside the root element".to_string(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }

        if roots > 1 {
            return Err(AppError::MalformedReport(
                "Report has more than one root element".to_string(),
            ));
        }
    }

    Ok(())
}

/// JUnit XML report parser
pub struct ReportParser<'a> {
    data: &'a [u8],
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Decodes the payload into a [`Report`].
    ///
    /// Only well-formedness and the required suite attributes (`name`,
    /// `tests`, `failures`) are checked. Header totals are not reconciled
    /// against the case list.
    pub fn parse(&self) -> AppResult<Report> {
        let text = std::str::from_utf8(self.data)
            .map_err(|e| AppError::MalformedReport(format!("Report is not valid UTF-8: {}", e)))?;

        if text.trim().is_empty() {
            return Err(AppError::MalformedReport("Empty report".to_string()));
        }

        ensure_single_root(text)?;

        let suite: SuiteElement = quick_xml::de::from_str(text)
            .map_err(|e| AppError::MalformedReport(format!("Invalid report XML: {}", e)))?;

        Ok(suite.into())
    }
}

impl From<SuiteElement> for Report {
    fn from(suite: SuiteElement) -> Self {
        Report {
            name: suite.name,
            total_tests: suite.tests,
            total_failures: suite.failures,
            total_errors: suite.errors,
            timestamp: suite.timestamp.filter(|t| !t.is_empty()),
            hostname: suite.hostname.filter(|h| !h.is_empty()),
            duration_seconds: suite.time.unwrap_or(0.0),
            cases: suite.testcases.into_iter().map(Case::from).collect(),
        }
    }
}

impl From<CaseElement> for Case {
    fn from(case: CaseElement) -> Self {
        Case {
            name: case.name,
            classname: case.classname,
            duration_seconds: case.time.unwrap_or(0.0),
            // Last failure element wins when a producer emits several
            failure: case.failures.into_iter().last().map(|f| Failure {
                kind: f.kind,
                message: f.message,
            }),
            skipped: !case.skip_markers.is_empty(),
        }
    }
}
