use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::rates::{RateMap, RateProvider};

// OpenErApiProvider implementation for RateProvider
pub struct OpenErApiProvider {
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str) -> Self {
        OpenErApiProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: RateMap,
}

#[async_trait]
impl RateProvider for OpenErApiProvider {
    #[instrument(
        name = "RateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<RateMap> {
        let endpoint = format!("/v6/latest/{base}");
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder().user_agent("fxc/0.2").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {} URL: {}", e, base, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(anyhow!("Received empty response for base: {}", base));
        }

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rate response for {}: {}", base, e))?;

        // The service reports failures inside a 200 body as well.
        if data.result.as_deref() == Some("error") {
            let kind = data.error_type.unwrap_or_else(|| "unknown".to_string());
            return Err(anyhow!("Rate service error for base {}: {}", base, kind));
        }

        if data.rates.is_empty() {
            return Err(anyhow!("No rates found for base: {}", base));
        }

        debug!("Fetched {} rates for base {}", data.rates.len(), base);
        Ok(data.rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(base: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v6/latest/{base}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "rates": {
                "USD": 1.0,
                "EUR": 0.92,
                "INR": 83.12
            }
        }"#;

        let mock_server = create_mock_server("USD", mock_response).await;

        let provider = OpenErApiProvider::new(&mock_server.uri());
        let rates = provider.fetch_rates("USD").await.unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates.get("EUR"), Some(&0.92));
        assert_eq!(rates.get("INR"), Some(&83.12));
    }

    #[tokio::test]
    async fn test_rates_field_is_required() {
        let mock_response = r#"{"result": "success", "base_code": "USD"}"#;
        let mock_server = create_mock_server("USD", mock_response).await;

        let provider = OpenErApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rates found for base: USD"
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = MockServer::start().await;
        let provider = OpenErApiProvider::new(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for base: USD"
        );
    }

    #[tokio::test]
    async fn test_api_malformed_response() {
        let mock_response = r#"{"result": "success", "rates": "not-a-map"}"#;
        let mock_server = create_mock_server("USD", mock_response).await;

        let provider = OpenErApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse rate response for USD")
        );
    }

    #[tokio::test]
    async fn test_api_error_envelope() {
        let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let mock_server = create_mock_server("XXX", mock_response).await;

        let provider = OpenErApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates("XXX").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Rate service error for base XXX: unsupported-code"
        );
    }

    #[tokio::test]
    async fn test_api_empty_response() {
        let mock_server = create_mock_server("USD", "").await;

        let provider = OpenErApiProvider::new(&mock_server.uri());
        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Received empty response for base: USD"
        );
    }
}
