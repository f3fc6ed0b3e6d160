//! Advisory reporting for CI source roots that still poll a hosted Git
//! service instead of receiving webhooks.
//!
//! The host supplies the configured roots, a read-only view of its webhook
//! storage and its hosting-connection registry; [`WebhookSuggestion`] groups
//! the roots by repository identity and emits one informational item per
//! (repository, root) pair that has no registered hook.

pub mod repo;
pub mod storage;
pub mod suggestion;
pub mod types;

pub use repo::{from_key, to_key, RepositoryInfo};
pub use storage::{HookInfo, HookStorage};
pub use suggestion::{find_suitable_roots, split_roots, WebhookSuggestion, CATEGORY, TYPE};
pub use types::{
    ConnectionRegistry, ItemCategory, ItemConsumer, ReportScope, Severity, SourceRoot,
    SuggestionItem,
};
