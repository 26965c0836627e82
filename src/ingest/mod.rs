pub mod parser;
pub mod report;
pub mod upload;

pub use parser::ReportParser;
pub use report::{Case, Failure, Report};
pub use upload::{read_report_file, UPLOAD_FIELD};
