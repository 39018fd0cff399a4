//! Pull request reference parsing

use crate::error::{Error, Result};
use crate::types::PrReference;
use url::Url;

/// Parse a PR URL into owner, repository and number.
///
/// Accepts `http(s)://host/owner/repo/pull/N`, optionally followed by more
/// path segments (`/files`, `/commits`, ...) and trailing slashes. Hosts
/// other than github.com are recorded for GitHub Enterprise.
pub fn parse_pr_reference(input: &str) -> Result<PrReference> {
    let invalid = || Error::InvalidReference(input.to_string());

    let url = Url::parse(input.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let host = url.host_str().ok_or_else(invalid)?.to_lowercase();
    let segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|s| !s.is_empty())
        .collect();

    // owner/repo/pull/N must be the first four segments
    let [owner, repo, "pull", number, ..] = segments.as_slice() else {
        return Err(invalid());
    };

    let number: u64 = number.parse().map_err(|_| invalid())?;
    if number == 0 {
        return Err(invalid());
    }

    let host = match host.as_str() {
        "github.com" | "www.github.com" => None,
        _ => Some(host),
    };

    Ok(PrReference {
        host,
        owner: (*owner).to_string(),
        repo: (*repo).to_string(),
        number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_url() {
        let parsed = parse_pr_reference("https://github.com/owner/repo/pull/123").unwrap();
        assert_eq!(parsed.owner, "owner");
        assert_eq!(parsed.repo, "repo");
        assert_eq!(parsed.number, 123);
        assert!(parsed.host.is_none());
    }

    #[test]
    fn test_parse_trailing_slash() {
        let parsed = parse_pr_reference("https://github.com/owner/repo/pull/123/").unwrap();
        assert_eq!(
            (parsed.owner.as_str(), parsed.repo.as_str(), parsed.number),
            ("owner", "repo", 123)
        );
    }

    #[test]
    fn test_parse_trailing_segments() {
        for suffix in ["files", "commits", "checks/"] {
            let url = format!("https://github.com/owner/repo/pull/123/{suffix}");
            let parsed = parse_pr_reference(&url).unwrap();
            assert_eq!(parsed.number, 123, "{url}");
        }
    }

    #[test]
    fn test_parse_enterprise_host() {
        let parsed =
            parse_pr_reference("https://GitHub.Example.com/platform/infra/pull/9").unwrap();
        assert_eq!(parsed.host.as_deref(), Some("github.example.com"));
        assert_eq!(parsed.owner, "platform");
    }

    #[test]
    fn test_invalid_references() {
        for input in [
            "https://invalid-url.com",
            "https://github.com/owner/repo",
            "https://github.com/owner/repo/issues/5",
            "https://github.com/owner/repo/pull/",
            "https://github.com/owner/repo/pull/abc",
            "https://github.com/owner/repo/pull/0",
            "ftp://github.com/owner/repo/pull/1",
            "owner/repo#1",
        ] {
            match parse_pr_reference(input) {
                Err(Error::InvalidReference(got)) => assert_eq!(got, input),
                other => panic!("expected InvalidReference for {input}, got {other:?}"),
            }
        }
    }
}
