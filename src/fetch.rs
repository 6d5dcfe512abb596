use std::path::PathBuf;

use anyhow::Context as _;
use reqwest::StatusCode;
use serde_json::Value;

use crate::cli::FetchArgs;
use crate::config::ApiConfig;
use crate::error::{FetchError, body_preview};
use crate::error_log::ErrorLog;
use crate::render::products::group_products_by_category;
use crate::store::DocumentStore;

pub const TOKEN_OPERATION: &str = "request_access_token";
pub const CATALOG_OPERATION: &str = "get_product_catalog";
pub const TOKEN_FIELD: &str = "Token";
pub const GRANT_TYPE: &str = "consumer_credentials";

const USER_AGENT: &str = concat!("catalogview/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the token and catalog endpoints.
///
/// Every failed call is recorded in the error log before it is returned.
/// Calls are made once; retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    config: ApiConfig,
    error_log: ErrorLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullSummary {
    pub path: PathBuf,
    pub bytes: usize,
    pub product_groups: usize,
    pub total_products: usize,
}

impl CatalogClient {
    pub fn new(config: ApiConfig, error_log: ErrorLog) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("build catalog http client")?;
        Ok(Self {
            http,
            config,
            error_log,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn fetch_token(&self, key: &str, secret: &str) -> Result<String, FetchError> {
        self.logged(self.request_token(key, secret))
    }

    /// Downloads the catalog, persisting the response bytes before parsing them.
    pub fn fetch_catalog(&self, token: &str, store: &DocumentStore) -> Result<Value, FetchError> {
        self.logged(self.request_catalog(token, store))
    }

    fn request_token(&self, key: &str, secret: &str) -> Result<String, FetchError> {
        let endpoint = self.config.token_endpoint();
        tracing::debug!(%endpoint, "requesting access token");

        let response = self
            .http
            .post(&endpoint)
            .form(&[
                ("grant_type", GRANT_TYPE),
                ("consumer_key", key),
                ("consumer_secret", secret),
            ])
            .send()
            .map_err(|source| FetchError::Transport {
                operation: TOKEN_OPERATION,
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| FetchError::Transport {
            operation: TOKEN_OPERATION,
            source,
        })?;
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                operation: TOKEN_OPERATION,
                status: status.as_u16(),
                body: body_preview(&body),
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|err| FetchError::Parse {
            operation: TOKEN_OPERATION,
            message: err.to_string(),
            body: Some(body_preview(&body)),
        })?;

        match value.get(TOKEN_FIELD).and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(token.to_owned()),
            _ => Err(FetchError::MissingField {
                operation: TOKEN_OPERATION,
                field: TOKEN_FIELD,
                body: body_preview(&body),
            }),
        }
    }

    fn request_catalog(&self, token: &str, store: &DocumentStore) -> Result<Value, FetchError> {
        let endpoint = self.config.catalog_endpoint();
        tracing::debug!(%endpoint, "requesting catalog");

        let response = self
            .http
            .get(&endpoint)
            .bearer_auth(token)
            .send()
            .map_err(|source| FetchError::Transport {
                operation: CATALOG_OPERATION,
                source,
            })?;

        let status = response.status();
        let bytes = response.bytes().map_err(|source| FetchError::Transport {
            operation: CATALOG_OPERATION,
            source,
        })?;
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                operation: CATALOG_OPERATION,
                status: status.as_u16(),
                body: body_preview(&String::from_utf8_lossy(&bytes)),
            });
        }

        store
            .write_raw(&bytes)
            .map_err(|source| FetchError::Persist {
                operation: CATALOG_OPERATION,
                path: store.path().to_path_buf(),
                source,
            })?;
        tracing::info!(path = %store.path().display(), bytes = bytes.len(), "persisted catalog response");

        serde_json::from_slice(&bytes).map_err(|err| FetchError::Parse {
            operation: CATALOG_OPERATION,
            message: err.to_string(),
            body: None,
        })
    }

    fn logged<T>(&self, result: Result<T, FetchError>) -> Result<T, FetchError> {
        if let Err(err) = &result {
            tracing::error!(kind = err.kind(), error = %err, "catalog fetch failed");
            self.error_log.record(&err.to_string());
        }
        result
    }
}

/// Token exchange followed by the catalog download.
pub fn pull(client: &CatalogClient, store: &DocumentStore) -> Result<PullSummary, FetchError> {
    tracing::info!("step 1: requesting access token");
    let config = client.config();
    let token = client.fetch_token(&config.consumer_key, &config.consumer_secret)?;
    tracing::info!("access token retrieved");

    tracing::info!("step 2: fetching product catalog");
    let catalog = client.fetch_catalog(&token, store)?;

    let grouping = group_products_by_category(&catalog);
    let bytes = std::fs::metadata(store.path())
        .map(|m| m.len() as usize)
        .unwrap_or_default();

    Ok(PullSummary {
        path: store.path().to_path_buf(),
        bytes,
        product_groups: grouping.groups.len(),
        total_products: grouping.total_products,
    })
}

pub fn run(args: FetchArgs) -> anyhow::Result<()> {
    let error_log = ErrorLog::new(&args.store.error_log);
    let config = match ApiConfig::from_args(&args.api) {
        Ok(config) => config,
        Err(err) => {
            error_log.record(&format!("configuration: {err:#}"));
            return Err(err).context("resolve api config");
        }
    };
    tracing::debug!(?config, "resolved api config");

    let store = DocumentStore::new(&args.store.document);
    let client = CatalogClient::new(config, error_log)?;
    let summary = pull(&client, &store).context("pull catalog")?;

    println!("Catalog saved to: {}", summary.path.display());
    println!(
        "Total products: {} in {} groups",
        summary.total_products, summary.product_groups
    );
    Ok(())
}
