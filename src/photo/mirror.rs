use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};

/// How long a single mirror request may block the add path before the
/// attempt is abandoned and reported as a mirror failure.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the remote mirror lives and how to talk to it.
///
/// `api_base` is the contents-API endpoint objects are written through;
/// `public_base` is the prefix of the canonical download URL a successful
/// upsert yields. Both are joined with the bare filename.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub api_base: String,
    pub public_base: String,
    pub token: String,
    pub timeout: Duration,
}

impl MirrorConfig {
    /// Config for a GitHub-hosted mirror: writes go through the repository
    /// contents API, downloads come from the raw host.
    pub fn github(repo: &str, branch: &str, folder: &str, token: &str) -> Self {
        MirrorConfig {
            api_base: format!("https://api.github.com/repos/{repo}/contents/{folder}"),
            public_base: format!("https://raw.githubusercontent.com/{repo}/{branch}/{folder}"),
            token: token.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Metadata the contents API returns for an existing object. Only the
/// version token matters here; everything else is ignored.
#[derive(Debug, Deserialize)]
struct ObjectMeta {
    sha: String,
}

/// PUT body for the contents API. `sha` must be present exactly when the
/// object already exists: omitting it on an existing object is rejected as
/// a conflict, and sending one for a missing object is rejected too.
#[derive(Debug, Serialize)]
struct UpsertRequest {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// Client for upserting photo blobs to the remote content store.
///
/// Keeps no state between calls: every upsert re-reads the current version
/// token, so concurrent external edits of the same object are arbitrated by
/// the remote API's own conflict check.
pub struct MirrorClient {
    config: MirrorConfig,
    http: reqwest::blocking::Client,
}

impl MirrorClient {
    pub fn new(config: MirrorConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InventoryError::MirrorFailed(e.to_string()))?;
        Ok(MirrorClient { config, http })
    }

    /// Create-or-update `filename` on the mirror with `bytes`.
    ///
    /// Returns the canonical download URL on success. Failures carry the
    /// response status and body and are never retried here; retry policy
    /// belongs to the caller.
    pub fn upsert(&self, bytes: &[u8], filename: &str) -> Result<String> {
        let url = format!("{}/{}", self.config.api_base, filename);

        // An existing object must be overwritten with its current version
        // token; a fresh object must be created without one.
        let sha = self.current_version(&url)?;

        let body = UpsertRequest {
            message: format!("Upload {filename}"),
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
            sha,
        };

        let resp = self
            .http
            .put(&url)
            .header("Authorization", format!("token {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .map_err(|e| InventoryError::MirrorFailed(e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 200 || status.as_u16() == 201 {
            let public_url = format!("{}/{}", self.config.public_base, filename);
            println!("☁️  Mirrored photo: {public_url}");
            Ok(public_url)
        } else {
            let detail = resp.text().unwrap_or_default();
            eprintln!("⚠️  Mirror upload failed ({status}): {detail}");
            Err(InventoryError::MirrorFailed(format!("{status}: {detail}")))
        }
    }

    /// Fetch the current version token for an object, or `None` when the
    /// object does not exist yet (any non-200 status means "not there").
    fn current_version(&self, url: &str) -> Result<Option<String>> {
        let resp = self
            .http
            .get(url)
            .header("Authorization", format!("token {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| InventoryError::MirrorFailed(e.to_string()))?;

        if resp.status().as_u16() != 200 {
            return Ok(None);
        }

        let meta: ObjectMeta = resp
            .json()
            .map_err(|e| InventoryError::MirrorFailed(format!("bad metadata body: {e}")))?;
        Ok(Some(meta.sha))
    }
}

impl std::fmt::Debug for MirrorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorClient")
            .field("api_base", &self.config.api_base)
            .field("public_base", &self.config.public_base)
            .finish()
    }
}
