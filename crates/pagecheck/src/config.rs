//! Suite configuration: where the app under test lives and how long lookups
//! wait.

use crate::result::{PagecheckError, PagecheckResult};
use crate::wait::WaitConfig;
use std::time::Duration;
use url::Url;

/// Environment variable holding the base URL of the app under test
pub const PREVIEW_URL_VAR: &str = "PREVIEW_URL";

/// Environment variable holding the preview protection bypass token
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";

/// Base URL used when `PREVIEW_URL` is unset or empty
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Query parameter carrying the access token
pub const BYPASS_PARAM: &str = "x-vercel-protection-bypass";

/// Where and how the suite runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    base_url: String,
    access_token: Option<String>,
    wait: WaitConfig,
}

impl SuiteConfig {
    /// Create a configuration for a base URL.
    ///
    /// A trailing `/` is removed so asset paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns [`PagecheckError::Config`] if the URL does not parse or is not
    /// http(s).
    pub fn new(base_url: impl AsRef<str>) -> PagecheckResult<Self> {
        let trimmed = base_url.as_ref().trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| PagecheckError::Config {
            message: format!("invalid base URL {trimmed:?}: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PagecheckError::Config {
                message: format!("base URL must be http or https, got {trimmed:?}"),
            });
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            access_token: None,
            wait: WaitConfig::default(),
        })
    }

    /// Read `PREVIEW_URL` and `ACCESS_TOKEN` from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `PREVIEW_URL` is not a valid URL.
    pub fn from_env() -> PagecheckResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not a valid URL.
    pub fn from_lookup<F>(lookup: F) -> PagecheckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let base = non_empty(PREVIEW_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let config = Self::new(base)?;
        Ok(match non_empty(ACCESS_TOKEN_VAR) {
            Some(token) => config.with_access_token(token),
            None => config,
        })
    }

    /// Set the access token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the implicit wait, keeping the poll interval
    #[must_use]
    pub const fn with_implicit_wait(mut self, timeout: Duration) -> Self {
        self.wait.timeout = timeout;
        self
    }

    /// Replace the whole wait configuration
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Access token, if any
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Implicit wait for lookups
    #[must_use]
    pub const fn wait(&self) -> WaitConfig {
        self.wait
    }

    /// URL every test case navigates to
    #[must_use]
    pub fn target_url(&self) -> String {
        match &self.access_token {
            Some(token) => format!("{}?{BYPASS_PARAM}={token}", self.base_url),
            None => self.base_url.clone(),
        }
    }

    /// Absolute URL of an asset served by the app
    #[must_use]
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            wait: WaitConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_localhost() {
        let config = SuiteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url(), "http://localhost:3000");
        assert_eq!(config.target_url(), "http://localhost:3000");
        assert_eq!(config.wait(), WaitConfig::default());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config =
            SuiteConfig::from_lookup(lookup(&[("PREVIEW_URL", ""), ("ACCESS_TOKEN", " ")])).unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.access_token().is_none());
    }

    #[test]
    fn test_token_appends_bypass_query() {
        let config = SuiteConfig::from_lookup(lookup(&[
            ("PREVIEW_URL", "https://preview.example.app/"),
            ("ACCESS_TOKEN", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(
            config.target_url(),
            "https://preview.example.app?x-vercel-protection-bypass=s3cret"
        );
    }

    #[test]
    fn test_asset_url() {
        let config = SuiteConfig::default();
        assert_eq!(
            config.asset_url("/_next/static/media/8by8-logo.a39d7aad.svg"),
            "http://localhost:3000/_next/static/media/8by8-logo.a39d7aad.svg"
        );
        assert_eq!(config.asset_url("x.png"), "http://localhost:3000/x.png");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = SuiteConfig::new("not a url").unwrap_err();
        assert!(matches!(err, PagecheckError::Config { .. }));
        assert!(SuiteConfig::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_implicit_wait_override() {
        let config = SuiteConfig::default().with_implicit_wait(Duration::from_millis(250));
        assert_eq!(config.wait().timeout, Duration::from_millis(250));
        assert_eq!(config.wait().poll_interval, crate::wait::DEFAULT_POLL_INTERVAL);
    }

    proptest! {
        #[test]
        fn prop_asset_url_has_single_slash(path in "[a-z0-9_.-]{1,20}(/[a-z0-9_.-]{1,20}){0,3}") {
            let config = SuiteConfig::new("http://localhost:3000/").unwrap();
            let with_slash = config.asset_url(&format!("/{path}"));
            let without = config.asset_url(&path);
            prop_assert_eq!(&with_slash, &without);
            prop_assert!(!with_slash.contains("3000//"));
        }
    }
}
