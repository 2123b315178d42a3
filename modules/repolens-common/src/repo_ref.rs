use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RepoLensError;

static FULL_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)/?$")
        .unwrap()
});
static SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").unwrap());

/// An `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a repository URL or `owner/repo` shorthand.
    ///
    /// Accepts `https://github.com/o/r`, `http://`, scheme-less and `www.`
    /// variants, trailing slashes and a `.git` suffix.
    pub fn parse(input: &str) -> Result<Self, RepoLensError> {
        let trimmed = input.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let caps = FULL_URL_RE
            .captures(trimmed)
            .or_else(|| SHORTHAND_RE.captures(trimmed))
            .ok_or_else(|| RepoLensError::InvalidRepoUrl(input.to_string()))?;

        Ok(Self::new(&caps[1], &caps[2]))
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_url_forms() {
        let expected = RepoRef::new("rust-lang", "cargo");
        for input in [
            "https://github.com/rust-lang/cargo",
            "http://github.com/rust-lang/cargo",
            "https://www.github.com/rust-lang/cargo",
            "github.com/rust-lang/cargo",
            "https://github.com/rust-lang/cargo.git",
            "https://github.com/rust-lang/cargo///",
            "  rust-lang/cargo  ",
        ] {
            assert_eq!(RepoRef::parse(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn keeps_dots_and_underscores_in_names() {
        let parsed = RepoRef::parse("some_org/my.repo-name").unwrap();
        assert_eq!(parsed.owner, "some_org");
        assert_eq!(parsed.name, "my.repo-name");
    }

    #[test]
    fn rejects_non_repository_inputs() {
        for input in [
            "",
            "just-a-name",
            "https://gitlab.com/owner/repo",
            "https://github.com/owner/repo/tree/main",
            "owner/repo/extra",
            "own er/repo",
        ] {
            assert!(
                matches!(RepoRef::parse(input), Err(RepoLensError::InvalidRepoUrl(_))),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn display_and_html_url() {
        let r = RepoRef::new("octo", "hello");
        assert_eq!(r.to_string(), "octo/hello");
        assert_eq!(r.html_url(), "https://github.com/octo/hello");
    }
}
