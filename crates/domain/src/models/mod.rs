//! Domain models for the Help Desk backend.

pub mod notification;
pub mod ticket;
pub mod user;

pub use notification::{
    EventTemplate, EventTemplateOverride, LifecycleEvent, MatrixDocument, NotificationMatrix,
    RecipientFlags, RecipientFlagsOverride, TemplateDocument, TemplateMap,
};
pub use ticket::{TicketPriority, TicketSnapshot, TicketStatus};
pub use user::UserRecord;
