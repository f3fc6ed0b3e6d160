use crate::repo::RepositoryInfo;
use crate::storage::HookStorage;
use crate::types::{
    ConnectionRegistry, ItemCategory, ItemConsumer, ReportScope, Severity, SourceRoot,
    SuggestionItem,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const TYPE: &str = "WebHooksSuggestion";

pub const CATEGORY: ItemCategory = ItemCategory {
    id: "switchToWebhook",
    severity: Severity::Info,
    description: "Reduce repository polling overhead and speed up change detection by switching to a webhook",
};

/// Advisory reporter that points out hosted repositories still detected by
/// polling. Collaborators are injected by the host; the reporter itself holds
/// no mutable state and may be invoked concurrently across scopes.
pub struct WebhookSuggestion<S, C> {
    storage: S,
    connections: C,
}

impl<S: HookStorage, C: ConnectionRegistry> WebhookSuggestion<S, C> {
    pub fn new(storage: S, connections: C) -> WebhookSuggestion<S, C> {
        WebhookSuggestion {
            storage,
            connections,
        }
    }

    pub fn type_name(&self) -> &'static str {
        TYPE
    }

    pub fn display_name(&self) -> &'static str {
        "Suggests installing a webhook for hosted repositories configured as source roots"
    }

    pub fn categories(&self) -> Vec<ItemCategory> {
        vec![CATEGORY]
    }

    /// Cheap existence check: stops at the first suitable root in scope.
    pub fn can_report_items_for(&self, scope: &dyn ReportScope) -> bool {
        if !scope.accepts_severity(CATEGORY.severity) {
            return false;
        }
        let mut found = false;
        find_suitable_roots(scope, |_| {
            found = true;
            false
        });
        found
    }

    /// Emit one suggestion item per (repository, root) pair still lacking a
    /// webhook, fanned out to the root, its build configurations and its
    /// projects.
    pub fn report(&self, scope: &dyn ReportScope, consumer: &mut dyn ItemConsumer) {
        let mut suitable = Vec::new();
        find_suitable_roots(scope, |root| {
            suitable.push(root);
            true
        });

        let split = split_roots(suitable);
        debug!("examining {} distinct repositories in scope", split.len());

        let filtered: Vec<(RepositoryInfo, HashSet<&SourceRoot>)> = split
            .into_iter()
            .filter(|(info, _)| self.storage.get_hooks(info).is_empty())
            .filter(|(info, _)| self.connections.is_connected_server(&info.server))
            .collect();

        for (info, roots) in filtered {
            // Something may have installed a hook since the filter above ran
            if !self.storage.get_hooks(&info).is_empty() {
                debug!(repository = %info.id(), "hook appeared after filtering, skipping");
                continue;
            }
            for root in roots {
                let item = SuggestionItem {
                    identity: format!("addWebHook.{}.{}", info.id(), root.id),
                    severity: CATEGORY.severity,
                    repository: info.clone(),
                    root_id: root.id,
                };
                consumer.consume_for_root(root, item.clone());
                for configuration in &root.usages_in_configurations {
                    consumer.consume_for_configuration(configuration, item.clone());
                }
                let mut projects: HashSet<&str> =
                    root.usages_in_projects.iter().map(String::as_str).collect();
                projects.insert(root.project.as_str());
                for project in projects {
                    consumer.consume_for_project(project, item.clone());
                }
            }
        }
    }
}

/// Walk the scope's roots and hand every suitable one to `visit`.
///
/// Suitable means the URL resolves to a repository identity with no
/// unresolved template parameters. `visit` returns false to stop the walk.
pub fn find_suitable_roots<'a>(
    scope: &'a dyn ReportScope,
    mut visit: impl FnMut(&'a SourceRoot) -> bool,
) {
    for root in scope.roots() {
        let url = match &root.url {
            Some(url) => url,
            None => continue,
        };
        let info = match RepositoryInfo::from_url(url) {
            Some(info) => info,
            None => continue,
        };
        if info.has_parameter_references {
            continue;
        }
        if !visit(root) {
            return;
        }
    }
}

/// Group roots by the repository they point at.
///
/// Roots whose URL does not resolve, or still carries unresolved references,
/// are left out. Syntactic URL differences (host case, trailing slash) do not
/// split a group.
pub fn split_roots<'a>(
    roots: impl IntoIterator<Item = &'a SourceRoot>,
) -> HashMap<RepositoryInfo, HashSet<&'a SourceRoot>> {
    let mut map: HashMap<RepositoryInfo, HashSet<&SourceRoot>> = HashMap::new();
    for root in roots {
        let url = match &root.url {
            Some(url) => url,
            None => continue,
        };
        let info = match RepositoryInfo::from_url(url) {
            Some(info) => info,
            None => continue,
        };
        if info.has_parameter_references {
            continue;
        }
        map.entry(info).or_default().insert(root);
    }
    map
}
