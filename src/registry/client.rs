//! Read-only npm registry client.
//!
//! Two operations, both authenticated with a bearer token: list the
//! packages belonging to an organization, and fetch the unpacked size of
//! a single package's latest version. Failures never propagate past this
//! module; listing degrades to an empty set and per-package fetches
//! degrade to `None`, so one bad package can never abort a whole run.

use crate::models::PackageSizeInfo;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Failure while fetching a single package's metadata document.
#[derive(Debug, Error)]
enum FetchError {
    /// The registry has no document for this package (HTTP 404).
    #[error("package not found")]
    NotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the npm registry.
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RegistryClient {
    /// Create a client for the registry at `base_url`.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("orgsize/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// List the names of all packages belonging to an organization.
    ///
    /// Any failure (transport, HTTP status, unexpected response shape)
    /// is logged and yields an empty list; an empty organization is a
    /// valid outcome for the rest of the pipeline.
    pub async fn list_org_packages(&self, org: &str) -> Vec<String> {
        match self.try_list_org_packages(org).await {
            Ok(names) => {
                debug!("Organization {} has {} packages", org, names.len());
                names
            }
            Err(e) => {
                error!("Failed to list packages for organization {}: {:#}", org, e);
                Vec::new()
            }
        }
    }

    async fn try_list_org_packages(&self, org: &str) -> Result<Vec<String>> {
        let url = format!("{}/-/org/{}/package", self.base_url, org);

        let doc: Value = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Request failed")?
            .error_for_status()
            .context("Registry returned an error status")?
            .json()
            .await
            .context("Response body was not valid JSON")?;

        // The listing endpoint maps package name -> access level; only
        // the keys matter here.
        let object = doc
            .as_object()
            .context("Unexpected response format: expected a JSON object")?;

        Ok(object.keys().cloned().collect())
    }

    /// Fetch the unpacked size of a package's latest published version.
    ///
    /// Returns `None` (with a diagnostic) when the package is missing
    /// from the registry, the metadata lacks a `latest` dist-tag, the
    /// tagged version entry is absent, the size field is not a number,
    /// or the request fails outright. A 404 is the expected
    /// package-not-found case and is logged distinctly.
    pub async fn get_package_size(&self, name: &str) -> Option<PackageSizeInfo> {
        match self.fetch_unpacked_size(name).await {
            Ok(Some(bytes)) => Some(PackageSizeInfo::new(name, bytes)),
            Ok(None) => {
                warn!("Skipping {}: no unpacked size in latest version metadata", name);
                None
            }
            Err(FetchError::NotFound) => {
                warn!("Package not found: {}", name);
                None
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", name, e);
                None
            }
        }
    }

    async fn fetch_unpacked_size(&self, name: &str) -> Result<Option<u64>, FetchError> {
        // Scoped names contain a slash and must be percent-encoded
        let url = format!("{}/{}", self.base_url, urlencoding::encode(name));

        let response = self.http.get(&url).bearer_auth(&self.token).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }

        let doc: Value = response.error_for_status()?.json().await?;
        Ok(extract_unpacked_size(&doc))
    }
}

/// Walk a package metadata document down to
/// `versions[dist-tags.latest].dist.unpackedSize`.
///
/// Every missing or mistyped step yields `None` rather than an error.
fn extract_unpacked_size(doc: &Value) -> Option<u64> {
    let latest = doc.get("dist-tags")?.get("latest")?.as_str()?;

    doc.get("versions")?
        .get(latest)?
        .get("dist")?
        .get("unpackedSize")?
        .as_u64()
}
