//! Development-area classification.
//!
//! Two independent classifiers live here. [`area_of`] maps a folder to at
//! most one area (first matching rule wins) and is the authoritative per-file
//! tag. [`message_areas`] tags a commit message with every matching area and
//! runs before any file detail is available. They deliberately do not share
//! rules: the two vocabularies overlap but disagree in places.

use std::sync::LazyLock;

use regex::Regex;

/// Folder used for files at the repository root.
pub const ROOT_FOLDER: &str = "/root";

/// Folder containing `path`, with a leading slash.
pub fn folder_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((parent, _)) => format!("/{parent}"),
        None => ROOT_FOLDER.to_string(),
    }
}

// =============================================================================
// Folder → area
// =============================================================================

/// Ordered (needles, area) table. Earlier rows win.
const FOLDER_RULES: &[(&[&str], &str)] = &[
    (&["test", "spec"], "testing"),
    (&["doc"], "documentation"),
    (&["src/api", "/api/"], "api"),
    (&["frontend", "client", "ui"], "frontend"),
    (&["backend", "server"], "backend"),
    (&["config", ".github"], "configuration"),
    (&["public", "static", "assets"], "assets"),
    (&["style", "css"], "styling"),
    (&["component"], "components"),
    (&["service"], "services"),
    (&["util", "helper"], "utilities"),
    (&["model", "schema"], "data-models"),
];

/// Development area of a folder, if any rule matches.
pub fn area_of(folder: &str) -> Option<&'static str> {
    let lower = folder.to_lowercase();
    FOLDER_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, area)| *area)
}

// =============================================================================
// Commit message → areas
// =============================================================================

static RE_FRONTEND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(frontend|front-end|ui|client)\b").unwrap());
static RE_BACKEND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(backend|back-end|server|api)\b").unwrap());
static RE_DATABASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(database|db|sql|mongo)\b").unwrap());
static RE_TESTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(test|testing|spec|jest|mocha)\b").unwrap());
static RE_DOCUMENTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(docs?|documentation|readme)\b").unwrap());
static RE_CONFIGURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(config|configuration|setup|env)\b").unwrap());
static RE_DEVOPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(ci|cd|pipeline|deploy|build)\b").unwrap());
static RE_AUTHENTICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(auth|authentication|login|security)\b").unwrap());
static RE_STYLING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(style|css|scss|styling)\b").unwrap());
static RE_BUG_FIXES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(fix|bug|issue|error)\b").unwrap());
static RE_FEATURES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(feature|feat|add|new)\b").unwrap());
static RE_REFACTORING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(refactor|cleanup|improve)\b").unwrap());
static RE_INFRASTRUCTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(infra|infrastructure|devops)\b").unwrap());

struct MessagePattern {
    area: &'static str,
    regex: &'static LazyLock<Regex>,
}

static MESSAGE_PATTERNS: &[MessagePattern] = &[
    MessagePattern { area: "frontend", regex: &RE_FRONTEND },
    MessagePattern { area: "backend", regex: &RE_BACKEND },
    MessagePattern { area: "database", regex: &RE_DATABASE },
    MessagePattern { area: "testing", regex: &RE_TESTING },
    MessagePattern { area: "documentation", regex: &RE_DOCUMENTATION },
    MessagePattern { area: "configuration", regex: &RE_CONFIGURATION },
    MessagePattern { area: "devops", regex: &RE_DEVOPS },
    MessagePattern { area: "authentication", regex: &RE_AUTHENTICATION },
    MessagePattern { area: "styling", regex: &RE_STYLING },
    MessagePattern { area: "bug-fixes", regex: &RE_BUG_FIXES },
    MessagePattern { area: "features", regex: &RE_FEATURES },
    MessagePattern { area: "refactoring", regex: &RE_REFACTORING },
    MessagePattern { area: "infrastructure", regex: &RE_INFRASTRUCTURE },
];

/// Every area whose keywords appear in the commit message, in table order.
pub fn message_areas(message: &str) -> Vec<&'static str> {
    MESSAGE_PATTERNS
        .iter()
        .filter(|p| p.regex.is_match(message))
        .map(|p| p.area)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_of_nested_path() {
        assert_eq!(folder_of("a/b/c.txt"), "/a/b");
        assert_eq!(folder_of("src/main.rs"), "/src");
    }

    #[test]
    fn folder_of_root_file() {
        assert_eq!(folder_of("c.txt"), "/root");
        assert_eq!(folder_of("README.md"), ROOT_FOLDER);
    }

    #[test]
    fn area_first_rule_wins() {
        assert_eq!(area_of("/src/tests/unit"), Some("testing"));
        // matches both documentation ("doc") and frontend ("ui"); documentation is earlier
        assert_eq!(area_of("/docs/ui"), Some("documentation"));
    }

    #[test]
    fn area_is_case_insensitive() {
        assert_eq!(area_of("/Server/Handlers"), Some("backend"));
        assert_eq!(area_of("/.GitHub/workflows"), Some("configuration"));
    }

    #[test]
    fn api_rule_needs_path_context() {
        assert_eq!(area_of("/src/api/v1"), Some("api"));
        assert_eq!(area_of("/lib/api/"), Some("api"));
        assert_eq!(area_of("/capital"), None);
    }

    #[test]
    fn unknown_folder_has_no_area() {
        assert_eq!(area_of("/root"), None);
        assert_eq!(area_of("/crates/engine"), None);
    }

    #[test]
    fn area_is_deterministic() {
        for folder in ["/src/components/button", "/assets/img", "/src/models"] {
            assert_eq!(area_of(folder), area_of(folder));
        }
        assert_eq!(area_of("/src/components/button"), Some("components"));
        assert_eq!(area_of("/src/models"), Some("data-models"));
    }

    #[test]
    fn message_collects_every_matching_area() {
        let areas = message_areas("Fix API auth bug and add tests for UI");
        assert_eq!(
            areas,
            vec!["frontend", "backend", "authentication", "bug-fixes", "features"]
        );
    }

    #[test]
    fn message_matches_whole_words_only() {
        // "building" and "fixture" must not trigger devops / bug-fixes
        assert!(message_areas("building fixtures").is_empty());
        assert_eq!(message_areas("Update README"), vec!["documentation"]);
        assert_eq!(message_areas("CI: build on push"), vec!["devops"]);
    }

    #[test]
    fn message_without_keywords_is_empty() {
        assert!(message_areas("Bump version to 1.2.3").is_empty());
    }
}
