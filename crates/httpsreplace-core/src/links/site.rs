//! The local site root: links to its host are "ours".

use anyhow::{Context, Result};

/// Parsed public URL of the site whose content is being upgraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    pub url: String,
    /// Normalized host (lowercase, IDNA).
    pub host: String,
    pub is_https: bool,
}

impl SiteRoot {
    pub fn parse(site_url: &str) -> Result<Self> {
        let parsed = url::Url::parse(site_url.trim())
            .with_context(|| format!("invalid site root URL: {site_url}"))?;
        let is_https = match parsed.scheme() {
            "https" => true,
            "http" => false,
            other => anyhow::bail!("site root must be http or https, got {other}: {site_url}"),
        };
        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("site root has no host: {site_url}"))?
            .to_lowercase();
        Ok(Self {
            url: site_url.trim().trim_end_matches('/').to_string(),
            host,
            is_https,
        })
    }

    /// True if `host` (already normalized) is this site.
    pub fn is_local(&self, host: &str) -> bool {
        self.host == host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_https_root() {
        let site = SiteRoot::parse("https://WWW.Example.com/moodle/").unwrap();
        assert!(site.is_https);
        assert_eq!(site.host, "www.example.com");
        assert_eq!(site.url, "https://WWW.Example.com/moodle");
        assert!(site.is_local("www.example.com"));
        assert!(!site.is_local("example.com"));
    }

    #[test]
    fn parse_http_root() {
        let site = SiteRoot::parse("http://lms.local").unwrap();
        assert!(!site.is_https);
    }

    #[test]
    fn reject_other_schemes_and_garbage() {
        assert!(SiteRoot::parse("ftp://files.example.com").is_err());
        assert!(SiteRoot::parse("not a url").is_err());
    }
}
