use std::fmt;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::cli::ApiArgs;

pub const DEFAULT_BASE_URL: &str = "https://sandbox.apps.whcc.com";

pub const BASE_URL_ENV: &str = "CATALOGVIEW_BASE_URL";
pub const CONSUMER_KEY_ENV: &str = "CATALOGVIEW_CONSUMER_KEY";
pub const CONSUMER_SECRET_ENV: &str = "CATALOGVIEW_CONSUMER_SECRET";

#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub timeout: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Combines CLI flags with credentials taken from the environment.
    pub fn from_args(args: &ApiArgs) -> anyhow::Result<Self> {
        Self::resolve(args, |name| std::env::var(name).ok())
    }

    fn resolve(args: &ApiArgs, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let base_url = args
            .base_url
            .clone()
            .or_else(|| non_empty(BASE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url =
            Url::parse(&base_url).with_context(|| format!("parse base url: {base_url}"))?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            anyhow::bail!("base url scheme must be http/https: {base_url}");
        }

        let consumer_key = non_empty(CONSUMER_KEY_ENV)
            .ok_or_else(|| anyhow::anyhow!("{CONSUMER_KEY_ENV} is not set"))?;
        let consumer_secret = non_empty(CONSUMER_SECRET_ENV)
            .ok_or_else(|| anyhow::anyhow!("{CONSUMER_SECRET_ENV} is not set"))?;

        Ok(Self {
            base_url,
            consumer_key,
            consumer_secret,
            timeout: Duration::from_secs(args.timeout_secs.max(1)),
        })
    }

    pub fn token_endpoint(&self) -> String {
        self.endpoint("api/AccessToken")
    }

    pub fn catalog_endpoint(&self) -> String {
        self.endpoint("api/catalog/")
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }
}
