//! Update checking against the release feed.

use lb_core::{file_utils, info, IntoJsonError, JsonError, RequestError, APP_VERSION_NAME};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FEED_URL: &str =
    "https://lightbox-viewer.net/releases/latest.json";

/// A published release, as the feed describes it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VersionInfo {
    pub version: String,
    pub download_url: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// When this entry was fetched (set locally, not by the feed).
    #[serde(default)]
    pub checked_at: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("feed carried an invalid version \"{version}\": {error}")]
    BadVersion {
        version: String,
        error: semver::Error,
    },
}

pub struct UpdateChecker {
    feed_url: String,
    last: Option<VersionInfo>,
}

impl UpdateChecker {
    /// `cached` is the last check persisted in the config, if any.
    pub fn new(feed_url: impl Into<String>, cached: Option<VersionInfo>) -> Self {
        Self {
            feed_url: feed_url.into(),
            last: cached,
        }
    }

    /// The most recent check result without hitting the network.
    pub fn last_checked(&self) -> Option<&VersionInfo> {
        self.last.as_ref()
    }

    /// Fetch the feed and compare against the running version.
    /// Returns `Some` only when the feed is strictly newer.
    pub async fn check_for_updates(&mut self) -> Result<Option<VersionInfo>, UpdateError> {
        let text = file_utils::download_to_string(&self.feed_url).await?;
        let mut latest: VersionInfo =
            serde_json::from_str(&text).json(text)?;
        latest.checked_at = Some(chrono::Utc::now().to_rfc3339());
        self.last = Some(latest.clone());

        if is_newer(&latest.version, APP_VERSION_NAME)? {
            info!("Update available: {}", latest.version);
            Ok(Some(latest))
        } else {
            Ok(None)
        }
    }
}

fn is_newer(candidate: &str, current: &str) -> Result<bool, UpdateError> {
    let parse = |version: &str| {
        semver::Version::parse(version).map_err(|error| UpdateError::BadVersion {
            version: version.to_owned(),
            error,
        })
    };
    Ok(parse(candidate)? > parse(current)?)
}
