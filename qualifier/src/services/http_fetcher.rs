//! Reference ProfileFetcher over a JSON-speaking profile endpoint
//!
//! GETs the profile URL, expects a JSON payload of raw profile fields and
//! maps transport/status failures onto the typed fetch-failure taxonomy so
//! the retry layer can classify them. Missing derived fields (experience
//! years, industry, connection count) are filled in by enrichment before the
//! profile crosses the fetch boundary.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::enrich;
use crate::traits::ProfileFetcher;
use shared::{CompanySizeBand, FetchError, RawProfile};

/// Per-request timeout for profile fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// ProfileFetcher implementation over HTTP.
pub struct HttpProfileFetcher {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl HttpProfileFetcher {
    /// Bearer `auth_token` is attached when present; sources that expose
    /// public profiles work without one.
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_token,
        }
    }

    fn map_status(status: StatusCode) -> FetchError {
        match status.as_u16() {
            401 | 403 => FetchError::AccessDenied,
            404 | 410 => FetchError::NotFound,
            408 => FetchError::Timeout,
            429 => FetchError::RateLimited,
            _ if status.is_server_error() => FetchError::ServerError(status.to_string()),
            _ => FetchError::InvalidPayload(format!("unexpected status {status}")),
        }
    }
}

#[async_trait]
impl ProfileFetcher for HttpProfileFetcher {
    async fn fetch_profile(&self, url: &str) -> Result<RawProfile, FetchError> {
        let target = validate_profile_url(url)?;

        let mut request = self.client.get(target).timeout(FETCH_TIMEOUT);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status));
        }

        let payload: ProfilePayload = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidPayload(e.to_string()))?;

        payload.into_profile(url)
    }
}

/// Check that an identifier is a fetchable profile URL before any network
/// call: absolute http(s), a host, and a non-root path naming a profile.
pub fn validate_profile_url(raw: &str) -> Result<Url, FetchError> {
    let parsed =
        Url::parse(raw).map_err(|e| FetchError::MalformedUrl(format!("{raw}: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FetchError::MalformedUrl(format!(
            "{raw}: unsupported scheme {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(FetchError::MalformedUrl(format!("{raw}: missing host")));
    }
    if parsed.path() == "/" || parsed.path().is_empty() {
        return Err(FetchError::MalformedUrl(format!(
            "{raw}: URL does not name a profile"
        )));
    }

    Ok(parsed)
}

/// Wire shape of a profile endpoint response.
#[derive(Debug, Deserialize)]
struct ProfilePayload {
    name: Option<String>,
    headline: Option<String>,
    current_position: Option<String>,
    current_company: Option<String>,
    location: Option<String>,
    industry: Option<String>,
    experience_years: Option<u32>,
    company_size: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    education: Vec<String>,
    connections: Option<ConnectionCount>,
    about: Option<String>,
}

/// Sources report connections either as a count or a display string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConnectionCount {
    Count(u32),
    Display(String),
}

impl ProfilePayload {
    fn into_profile(self, url: &str) -> Result<RawProfile, FetchError> {
        let name = match self.name {
            Some(name) if enrich::plausible_name(&name) => name,
            Some(name) => {
                return Err(FetchError::InvalidPayload(format!(
                    "implausible profile name: {name:?}"
                )))
            }
            None => {
                return Err(FetchError::InvalidPayload(
                    "profile payload has no name".to_string(),
                ))
            }
        };

        let experience_years = self.experience_years.or_else(|| {
            enrich::estimate_experience_years(self.headline.as_deref(), self.about.as_deref())
        });
        let industry = self.industry.or_else(|| {
            enrich::infer_industry(self.headline.as_deref(), self.about.as_deref())
        });

        let company_size = self.company_size.as_deref().and_then(|raw| {
            match raw.parse::<CompanySizeBand>() {
                Ok(band) => Some(band),
                Err(reason) => {
                    debug!(url, %reason, "ignoring unparseable company size");
                    None
                }
            }
        });

        let connections = self.connections.and_then(|count| match count {
            ConnectionCount::Count(n) => Some(n),
            ConnectionCount::Display(text) => enrich::parse_connection_count(&text),
        });

        Ok(RawProfile {
            url: url.to_string(),
            name: Some(name),
            headline: self.headline,
            current_position: self.current_position,
            current_company: self.current_company,
            location: self.location,
            industry,
            experience_years,
            company_size,
            skills: self.skills,
            education: self.education,
            connections,
            about: self.about,
            fetched_at: Utc::now(),
        })
    }
}
