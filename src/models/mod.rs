pub mod destination;
pub mod notification;
pub mod summary;

pub use destination::{ConversationInfo, Destination};
pub use notification::{Attachment, Notification, NotificationField, StatusColor};
pub use summary::{PendingNotification, Summary};
