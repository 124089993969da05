//! Package registry version queries.
//!
//! A thin blocking client over the npm registry's `/<package>/latest`
//! endpoint, with bounded-parallel resolution for a batch of names. All
//! queries of a batch are joined before any caller proceeds; a single
//! failed query fails the batch.

use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use rayon::prelude::*;
use serde_json::Value;

/// Default registry endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default number of concurrent registry queries.
pub const DEFAULT_CONCURRENCY: usize = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from registry interaction.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A version query failed (network error or non-success status).
    #[error("version query for \"{package}\" failed: {source}")]
    Request {
        package: String,
        #[source]
        source: reqwest::Error,
    },

    /// The registry response carried no version string.
    #[error("registry response for \"{package}\" has no version field")]
    MissingVersion { package: String },

    /// The bounded query pool could not be constructed.
    #[error("failed to build query thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Blocking registry client.
pub struct RegistryClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RegistryClient {
    /// Creates a client against the given registry base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RegistryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RegistryError::Client)?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Resolves the latest published version of one package.
    pub fn latest_version(&self, package: &str) -> Result<String, RegistryError> {
        let url = format!(
            "{}/{}/latest",
            self.base_url.trim_end_matches('/'),
            encode_package_name(package)
        );
        debug!("GET {url}");

        let body: Value = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|source| RegistryError::Request {
                package: package.to_string(),
                source,
            })?;

        body.get("version")
            .and_then(Value::as_str)
            .map(|version| version.trim().to_string())
            .ok_or_else(|| RegistryError::MissingVersion {
                package: package.to_string(),
            })
    }

    /// Resolves the latest versions for a batch of packages over a bounded
    /// thread pool, logging each resolution. Returns only when every query
    /// has completed; the first failure fails the whole batch.
    pub fn latest_versions(
        &self,
        packages: &[String],
        concurrency: usize,
    ) -> Result<HashMap<String, String>, RegistryError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency.max(1))
            .build()?;

        let resolved: Result<Vec<(String, String)>, RegistryError> = pool.install(|| {
            packages
                .par_iter()
                .map(|package| {
                    let version = self.latest_version(package)?;
                    println!("Found version \"{version}\" for \"{package}\"");
                    Ok((package.clone(), version))
                })
                .collect()
        });

        Ok(resolved?.into_iter().collect())
    }
}

/// Scoped package names contain a `/` that must not read as a URL path
/// separator.
fn encode_package_name(name: &str) -> String {
    name.replace('/', "%2F")
}
