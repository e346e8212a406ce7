use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use common::{Bar, BarSource, Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

const INTERVAL: &str = "1min";
const OUTPUT_SIZE: u32 = 150;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// REST client for the Twelve Data `time_series` endpoint.
///
/// Borrows the process-wide `reqwest::Client`; never builds its own.
pub struct TwelveDataClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl TwelveDataClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the latest 1-minute bars for `pair`, newest first.
    pub async fn time_series(&self, pair: &str) -> Result<Vec<Bar>> {
        let url = format!("{}/time_series", self.base_url);
        let output_size = OUTPUT_SIZE.to_string();

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("symbol", pair),
                ("interval", INTERVAL),
                ("apikey", self.api_key.as_str()),
                ("outputsize", output_size.as_str()),
                ("format", "JSON"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Http(format!("HTTP {status}: {body}")));
        }
        parse_time_series(&body)
    }
}

#[async_trait]
impl BarSource for TwelveDataClient {
    async fn fetch(&self, pair: &str) -> Option<Vec<Bar>> {
        match self.time_series(pair).await {
            Ok(bars) => {
                debug!(pair = %pair, count = bars.len(), "Fetched bars");
                Some(bars)
            }
            Err(e) => {
                warn!(pair = %pair, error = %e, "Bar fetch failed; skipping pair this cycle");
                None
            }
        }
    }
}

/// Decode a `time_series` body. Keeps the provider's newest-first order.
fn parse_time_series(body: &str) -> Result<Vec<Bar>> {
    let resp: TimeSeriesResponse = serde_json::from_str(body)?;

    if resp.status.as_deref() == Some("error") {
        return Err(Error::Provider {
            code: resp.code.unwrap_or_default(),
            message: resp.message.unwrap_or_default(),
        });
    }

    resp.values
        .ok_or_else(|| Error::Parse("response has no `values` field".to_string()))?
        .into_iter()
        .map(RawBar::into_bar)
        .collect()
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TimeSeriesResponse {
    status: Option<String>,
    code: Option<i64>,
    message: Option<String>,
    values: Option<Vec<RawBar>>,
}

#[derive(Deserialize)]
struct RawBar {
    datetime: Option<String>,
    open: Option<Price>,
    high: Price,
    low: Price,
    close: Price,
}

/// Twelve Data sends prices as strings; accept bare numbers too.
#[derive(Deserialize)]
#[serde(untagged)]
enum Price {
    Text(String),
    Number(f64),
}

impl Price {
    fn value(&self, field: &str) -> Result<f64> {
        match self {
            Price::Number(v) => Ok(*v),
            Price::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| Error::Parse(format!("{field} '{s}': {e}"))),
        }
    }
}

impl RawBar {
    fn into_bar(self) -> Result<Bar> {
        let close = self.close.value("close")?;
        let open = match &self.open {
            Some(open) => open.value("open")?,
            None => close,
        };
        Ok(Bar {
            datetime: self.datetime.as_deref().and_then(parse_datetime),
            open,
            high: self.high.value("high")?,
            low: self.low.value("low")?,
            close,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const GOOD_BODY: &str = r#"{
        "meta": {"symbol": "EUR/USD", "interval": "1min"},
        "values": [
            {"datetime": "2024-05-01 10:02:00", "open": "1.0702", "high": "1.0710", "low": "1.0700", "close": "1.0705"},
            {"datetime": "2024-05-01 10:01:00", "open": "1.0699", "high": "1.0704", "low": "1.0695", "close": "1.0702"},
            {"datetime": "2024-05-01 10:00:00", "open": "1.0690", "high": "1.0701", "low": "1.0688", "close": "1.0699"}
        ],
        "status": "ok"
    }"#;

    fn client_for(server: &MockServer) -> TwelveDataClient {
        TwelveDataClient::new(Client::new(), "demo").with_base_url(server.uri())
    }

    #[test]
    fn parses_values_newest_first() {
        let bars = parse_time_series(GOOD_BODY).unwrap();
        assert_eq!(bars.len(), 3);
        assert!((bars[0].close - 1.0705).abs() < 1e-12);
        assert!((bars[2].low - 1.0688).abs() < 1e-12);
        let expected = NaiveDateTime::parse_from_str("2024-05-01 10:02:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(bars[0].datetime, Some(expected));
    }

    #[test]
    fn provider_error_payload_is_an_error() {
        let body = r#"{"code": 401, "message": "**apikey** parameter is incorrect", "status": "error"}"#;
        match parse_time_series(body) {
            Err(Error::Provider { code, message }) => {
                assert_eq!(code, 401);
                assert!(message.contains("apikey"));
            }
            other => panic!("Expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn missing_values_is_an_error() {
        let body = r#"{"meta": {"symbol": "EUR/USD"}, "status": "ok"}"#;
        assert!(matches!(parse_time_series(body), Err(Error::Parse(_))));
    }

    #[test]
    fn non_numeric_price_is_an_error() {
        let body = r#"{"values": [{"datetime": "2024-05-01 10:00:00", "open": "1.0", "high": "x", "low": "0.9", "close": "1.0"}]}"#;
        assert!(matches!(parse_time_series(body), Err(Error::Parse(_))));
    }

    #[test]
    fn numeric_prices_and_missing_open_are_accepted() {
        let body = r#"{"values": [{"high": 2.0, "low": 1.0, "close": 1.5}]}"#;
        let bars = parse_time_series(body).unwrap();
        assert!((bars[0].open - 1.5).abs() < 1e-12);
        assert!(bars[0].datetime.is_none());
    }

    #[test]
    fn daily_datetime_parses_to_midnight() {
        let dt = parse_datetime("2024-05-01").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
        assert!(parse_datetime("yesterday").is_none());
    }

    #[tokio::test]
    async fn fetch_sends_expected_query_and_returns_bars() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/time_series"))
            .and(query_param("symbol", "EUR/USD"))
            .and(query_param("interval", "1min"))
            .and(query_param("outputsize", "150"))
            .and(query_param("apikey", "demo"))
            .and(query_param("format", "JSON"))
            .respond_with(ResponseTemplate::new(200).set_body_string(GOOD_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let bars = client_for(&server).fetch("EUR/USD").await;
        assert_eq!(bars.map(|b| b.len()), Some(3));
    }

    #[tokio::test]
    async fn fetch_returns_none_without_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/time_series"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": "ok"}"#))
            .mount(&server)
            .await;

        assert!(client_for(&server).fetch("EUR/USD").await.is_none());
    }

    #[tokio::test]
    async fn fetch_returns_none_on_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/time_series"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code": 429, "message": "run out of API credits", "status": "error"}"#,
            ))
            .mount(&server)
            .await;

        assert!(client_for(&server).fetch("AUD/USD").await.is_none());
    }

    #[tokio::test]
    async fn fetch_returns_none_on_http_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        assert!(client_for(&server).fetch("EUR/USD").await.is_none());
    }

    #[tokio::test]
    async fn fetch_returns_none_on_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        assert!(client_for(&server).fetch("EUR/USD").await.is_none());
    }

    #[tokio::test]
    async fn fetch_returns_none_when_host_unreachable() {
        let client = TwelveDataClient::new(Client::new(), "demo").with_base_url("http://127.0.0.1:1");
        assert!(client.fetch("EUR/USD").await.is_none());
    }
}
