//! Domain services: event classification, recipient resolution, and
//! template rendering.

pub mod classifier;
pub mod recipients;
pub mod template;

pub use classifier::classify;
pub use recipients::{
    resolve_recipients, InMemoryDirectory, InMemoryPolicyStore, NotificationPolicyStore,
    RecipientDirectory, StoreError,
};
pub use template::{render, RenderedMessage};
