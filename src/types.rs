use crate::repo::RepositoryInfo;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Health-report severities, ordered from least to most pressing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Category a report item is filed under in the host's health report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCategory {
    pub id: &'static str,
    pub severity: Severity,
    pub description: &'static str,
}

/// One "install a webhook" advisory for a (repository, root) pair.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SuggestionItem {
    /// Stable identity so repeated reports coalesce in the host UI.
    pub identity: String,
    pub severity: Severity,
    pub repository: RepositoryInfo,
    pub root_id: u64,
}

/// A configured VCS connection, as handed over by the host.
///
/// Identity follows the host's stable root id; the usage lists carry the ids
/// of build configurations and projects the root is attached to.
#[derive(Debug, Clone, Eq)]
pub struct SourceRoot {
    pub id: u64,
    pub name: String,
    pub url: Option<String>,
    pub usages_in_configurations: Vec<String>,
    pub usages_in_projects: Vec<String>,
    /// Id of the project the root itself belongs to.
    pub project: String,
}

impl PartialEq for SourceRoot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for SourceRoot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The set of roots a report invocation may examine, plus the host's
/// severity gate.
pub trait ReportScope {
    fn accepts_severity(&self, severity: Severity) -> bool;
    fn roots(&self) -> &[SourceRoot];
}

/// Answers whether a server has a configured hosting connection.
pub trait ConnectionRegistry {
    fn is_connected_server(&self, server: &str) -> bool;
}

/// Sink for emitted suggestion items, keyed by the consuming context.
pub trait ItemConsumer {
    fn consume_for_root(&mut self, root: &SourceRoot, item: SuggestionItem);
    fn consume_for_configuration(&mut self, configuration_id: &str, item: SuggestionItem);
    fn consume_for_project(&mut self, project_id: &str, item: SuggestionItem);
}
