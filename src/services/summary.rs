use crate::ingest::Report;
use crate::models::Summary;

/// Reduces a report to the counts needed for a notification.
///
/// `total_tests` and `total_failures` come from the suite header as-is; the
/// case list may be truncated by some producers. `skipped_count` is recounted
/// from the cases because reporting tools undercount it.
pub fn aggregate(report: &Report, destination_name: &str) -> Summary {
    let skipped_count = report.cases.iter().filter(|case| case.skipped).count();

    Summary {
        destination_name: destination_name.to_string(),
        suite_name: report.name.clone(),
        total_tests: i64::from(report.total_tests),
        total_failures: i64::from(report.total_failures),
        skipped_count: skipped_count as i64,
    }
}
