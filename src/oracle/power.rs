//! NASA POWER daily point API client.

use crate::oracle::error::OracleError;
use crate::oracle::PointOracle;
use crate::types::sample::QueryKey;
use async_trait::async_trait;
use bon::bon;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
pub const DEFAULT_COMMUNITY: &str = "RE";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fill value POWER reports for dates it has no data for.
pub const FILL_VALUE: f64 = -999.0;

/// HTTP client for the POWER daily point endpoint.
///
/// One `reqwest::Client` is shared by every request made through this value, so
/// connections are pooled across a batch. Each request is bounded by
/// `request_timeout`.
///
/// # Examples
///
/// ```
/// # use climate_odds::PowerClient;
/// # use std::time::Duration;
/// # fn run() -> Result<(), climate_odds::OracleError> {
/// let client = PowerClient::builder()
///     .request_timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PowerClient {
    client: Client,
    base_url: String,
    community: String,
}

#[bon]
impl PowerClient {
    #[builder]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] community: Option<String>,
        request_timeout: Option<Duration>,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
            .build()
            .map_err(OracleError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            community: community.unwrap_or_else(|| DEFAULT_COMMUNITY.to_string()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PointOracle for PowerClient {
    async fn fetch(&self, code: &str, key: &QueryKey) -> Result<Option<f64>, OracleError> {
        let date = key.date_key();
        let longitude = key.location.lon().to_string();
        let latitude = key.location.lat().to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("parameters", code),
                ("community", self.community.as_str()),
                ("longitude", longitude.as_str()),
                ("latitude", latitude.as_str()),
                ("start", date.as_str()),
                ("end", date.as_str()),
                ("format", "JSON"),
            ])
            .send()
            .await
            .map_err(|e| OracleError::NetworkRequest(self.base_url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                debug!("HTTP error for {} on {}: {:?}", code, date, e);
                return Err(if let Some(status) = e.status() {
                    OracleError::HttpStatus {
                        url: self.base_url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    OracleError::NetworkRequest(self.base_url.clone(), e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| OracleError::BodyRead(self.base_url.clone(), e))?;
        parse_point_value(&body, code, &date)
    }
}

/// Extracts `properties.parameter.<code>.<date>` from a POWER response body.
///
/// Any absent key along the path, or the fill value, means the service has no
/// value for the date. A present but non-numeric value is malformed.
pub fn parse_point_value(body: &[u8], code: &str, date: &str) -> Result<Option<f64>, OracleError> {
    let json: Value = serde_json::from_slice(body)?;
    let Some(raw) = json
        .get("properties")
        .and_then(|p| p.get("parameter"))
        .and_then(|p| p.get(code))
        .and_then(|series| series.get(date))
    else {
        return Ok(None);
    };
    let value = raw.as_f64().ok_or_else(|| OracleError::MalformedValue {
        code: code.to_string(),
        date: date.to_string(),
    })?;
    if value == FILL_VALUE {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}
