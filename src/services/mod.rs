pub mod notification;
pub mod registry;
pub mod report;
pub mod summary;

pub use notification::{format_notification, MessagingProvider, ProviderError, SlackClient};
pub use registry::DestinationRegistry;
pub use report::{QueuedReport, ReportService};
pub use summary::aggregate;
