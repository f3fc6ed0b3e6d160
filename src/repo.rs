use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Identity of a hosted repository a source root points at.
///
/// Equality and hashing cover (server, owner, name) only, so two roots whose
/// raw URLs differ in host case or a trailing slash still compare equal.
#[derive(Serialize, Deserialize, Debug, Clone, Eq)]
pub struct RepositoryInfo {
    pub server: String,
    pub owner: String,
    pub name: String,
    /// True when the source URL still contains unresolved `%...%` template
    /// parameters and cannot name a concrete repository.
    pub has_parameter_references: bool,
}

impl PartialEq for RepositoryInfo {
    fn eq(&self, other: &Self) -> bool {
        self.server == other.server && self.owner == other.owner && self.name == other.name
    }
}

impl Hash for RepositoryInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.server.hash(state);
        self.owner.hash(state);
        self.name.hash(state);
    }
}

impl RepositoryInfo {
    /// Extract repository identity from a source root's fetch URL.
    ///
    /// Recognizes web URLs (`https://host/owner/name`), ssh URLs
    /// (`ssh://git@host/owner/name`) and scp-like remotes
    /// (`git@host:owner/name`), with or without a `.git` suffix.
    /// Returns `None` for anything else.
    pub fn from_url(url: &str) -> Option<RepositoryInfo> {
        let has_parameter_references = contains_parameter_references(url);
        let url = url.trim();

        let (host, path) = if let Some(rest) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .or_else(|| url.strip_prefix("ssh://"))
        {
            split_host_path(rest)?
        } else {
            split_scp_like(url)?
        };

        // Drop userinfo ("git@github.com" -> "github.com")
        let host = host.rsplit('@').next()?;
        if host.is_empty() {
            return None;
        }

        let mut segments = path.trim_matches('/').split('/');
        let owner = segments.next().filter(|s| !s.is_empty())?;
        let name = segments.next().filter(|s| !s.is_empty())?;
        if segments.next().is_some() {
            return None;
        }
        let name = name.trim_end_matches(".git");
        if name.is_empty() {
            return None;
        }

        Some(RepositoryInfo {
            server: host.to_lowercase(),
            owner: owner.to_string(),
            name: name.to_string(),
            has_parameter_references,
        })
    }

    /// Canonical string identity, `server/owner/name`.
    pub fn id(&self) -> String {
        to_key(&self.server, &self.owner, &self.name)
    }
}

/// Build the canonical storage key for a repository triple.
///
/// Any trailing slash on `server` is stripped; owner and name are used as-is.
pub fn to_key(server: &str, owner: &str, name: &str) -> String {
    format!("{}/{}/{}", server.trim_end_matches('/'), owner, name)
}

/// Recover the (server, owner, name) triple from a canonical key.
///
/// Owner and name never contain a slash, so the key is split from the right;
/// whatever remains on the left is the server. Inverts `to_key` modulo the
/// trailing-slash normalization.
pub fn from_key(key: &str) -> Option<(String, String, String)> {
    let mut parts = key.rsplitn(3, '/');
    let name = parts.next()?;
    let owner = parts.next()?;
    let server = parts.next()?;
    if server.is_empty() || owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((server.to_string(), owner.to_string(), name.to_string()))
}

/// Check for an unresolved `%parameter%` reference anywhere in the URL.
fn contains_parameter_references(url: &str) -> bool {
    let mut rest = url;
    while let Some(start) = rest.find('%') {
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(0) => rest = &after[1..], // literal "%%", keep scanning
            Some(_) => return true,
            None => return false,
        }
    }
    false
}

fn split_host_path(rest: &str) -> Option<(&str, &str)> {
    let slash = rest.find('/')?;
    Some((&rest[..slash], &rest[slash + 1..]))
}

fn split_scp_like(url: &str) -> Option<(&str, &str)> {
    // "git@host:owner/name" — userinfo is mandatory, host carries no slash
    let at = url.find('@')?;
    let colon = url[at..].find(':')? + at;
    let host = &url[at + 1..colon];
    if host.is_empty() || host.contains('/') {
        return None;
    }
    Some((host, &url[colon + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn do_key_test(server: &str, owner: &str, name: &str, expected_key: &str) {
        let key = to_key(server, owner, name);
        assert_eq!(key, expected_key);
        let triple = from_key(&key).unwrap();
        assert_eq!(
            triple,
            (
                server.trim_end_matches('/').to_string(),
                owner.to_string(),
                name.to_string()
            )
        );
    }

    #[test]
    fn key_transformation() {
        do_key_test("github.com", "JetBrains", "kotlin", "github.com/JetBrains/kotlin");
        do_key_test("github.com/", "JetBrains", "kotlin", "github.com/JetBrains/kotlin");
        do_key_test(
            "teamcity-github-enterprise.labs.intellij.net/",
            "Vlad",
            "test-repo-1",
            "teamcity-github-enterprise.labs.intellij.net/Vlad/test-repo-1",
        );
    }

    #[test]
    fn from_key_rejects_truncated_keys() {
        assert_eq!(from_key("github.com/JetBrains"), None);
        assert_eq!(from_key("kotlin"), None);
        assert_eq!(from_key("github.com//kotlin"), None);
        assert_eq!(from_key(""), None);
    }

    #[test]
    fn extracts_web_urls() {
        let info = RepositoryInfo::from_url("https://github.com/JetBrains/kotlin").unwrap();
        assert_eq!(info.server, "github.com");
        assert_eq!(info.owner, "JetBrains");
        assert_eq!(info.name, "kotlin");
        assert!(!info.has_parameter_references);

        let info = RepositoryInfo::from_url("https://github.com/JetBrains/kotlin.git").unwrap();
        assert_eq!(info.name, "kotlin");

        let info = RepositoryInfo::from_url("http://ghe.local/Vlad/test-repo-1").unwrap();
        assert_eq!(info.server, "ghe.local");
    }

    #[test]
    fn extracts_ssh_and_scp_urls() {
        let info = RepositoryInfo::from_url("ssh://git@github.com/JetBrains/kotlin.git").unwrap();
        assert_eq!(info.server, "github.com");
        assert_eq!(info.owner, "JetBrains");
        assert_eq!(info.name, "kotlin");

        let info = RepositoryInfo::from_url("git@github.com:JetBrains/kotlin.git").unwrap();
        assert_eq!(info.server, "github.com");
        assert_eq!(info.owner, "JetBrains");
        assert_eq!(info.name, "kotlin");
    }

    #[test]
    fn normalizes_host_but_not_owner_or_name() {
        let a = RepositoryInfo::from_url("https://GitHub.COM/JetBrains/kotlin").unwrap();
        let b = RepositoryInfo::from_url("https://github.com/JetBrains/kotlin/").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.server, "github.com");

        let c = RepositoryInfo::from_url("https://github.com/jetbrains/kotlin").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn rejects_unrecognized_urls() {
        assert_eq!(RepositoryInfo::from_url(""), None);
        assert_eq!(RepositoryInfo::from_url("not a url"), None);
        assert_eq!(RepositoryInfo::from_url("https://github.com/JetBrains"), None);
        assert_eq!(RepositoryInfo::from_url("https://github.com/a/b/c"), None);
        assert_eq!(RepositoryInfo::from_url("https://github.com//kotlin"), None);
        assert_eq!(RepositoryInfo::from_url("ftp://github.com/JetBrains/kotlin"), None);
    }

    #[test]
    fn flags_parameter_references() {
        let info =
            RepositoryInfo::from_url("https://github.com/%github.owner%/kotlin").unwrap();
        assert!(info.has_parameter_references);

        let info = RepositoryInfo::from_url("https://github.com/owner%%x/kotlin").unwrap();
        assert!(!info.has_parameter_references);
    }

    #[test]
    fn equality_ignores_parameter_flag() {
        let mut a = RepositoryInfo::from_url("https://github.com/JetBrains/kotlin").unwrap();
        let b = a.clone();
        a.has_parameter_references = true;
        assert_eq!(a, b);

        let hash = |info: &RepositoryInfo| {
            let mut hasher = DefaultHasher::new();
            info.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }
}
