use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::warn;
use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::policy::ProviderPolicy;
use crate::source::{DailySeriesSource, SeriesRequest, SourceError};
use crate::throttling::QuotaGate;
use crate::{DailyRecord, TradingDate};

const QUERY_URL: &str = "https://www.alphavantage.co/query";
const REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Alpha Vantage `TIME_SERIES_DAILY` source.
///
/// The transport is injectable so tests run against canned responses; the
/// default transport is the offline no-op client.
#[derive(Clone)]
pub struct AlphaVantageSource {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    quota: QuotaGate,
}

impl Default for AlphaVantageSource {
    fn default() -> Self {
        let policy = ProviderPolicy::alphavantage_free_tier();
        Self {
            http_client: Arc::new(NoopHttpClient),
            api_key: std::env::var("TICKWATCH_ALPHAVANTAGE_API_KEY")
                .unwrap_or_else(|_| String::from("demo")),
            quota: QuotaGate::from_policy(&policy),
        }
    }
}

impl AlphaVantageSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    async fn fetch_daily(&self, req: &SeriesRequest) -> Result<Vec<DailyRecord>, SourceError> {
        if let Err(cooldown) = self.quota.try_acquire() {
            return Err(SourceError::rate_limited(format!(
                "alphavantage free-tier limit exceeded; retry in {:.0}s",
                cooldown.as_secs_f64()
            )));
        }

        let endpoint = format!(
            "{QUERY_URL}?function=TIME_SERIES_DAILY&symbol={}&apikey={}",
            req.symbol.as_str(),
            self.api_key
        );
        let request = HttpRequest::get(endpoint).with_timeout_ms(REQUEST_TIMEOUT_MS);

        let response = self.http_client.execute(request).await.map_err(|error| {
            let detail = format!("alphavantage transport error: {error}");
            if error.retryable() {
                SourceError::unavailable(detail)
            } else {
                SourceError::internal(detail)
            }
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "alphavantage upstream returned status {}",
                response.status
            )));
        }

        parse_daily_body(&response.body, req.symbol.as_str())
    }
}

impl DailySeriesSource for AlphaVantageSource {
    fn daily_series<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DailyRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_daily(&req).await })
    }
}

/// Parse a `TIME_SERIES_DAILY` body into records ordered descending by date.
///
/// Alpha Vantage encodes every number as a JSON string and reports unknown
/// symbols and quota exhaustion as 200 responses with `Error Message` / `Note`
/// bodies; both collapse into error results here. Individual malformed rows
/// are skipped, not fatal.
fn parse_daily_body(body: &str, symbol: &str) -> Result<Vec<DailyRecord>, SourceError> {
    let response: DailyResponse = serde_json::from_str(body).map_err(|error| {
        SourceError::internal(format!("failed to parse alphavantage response: {error}"))
    })?;

    if let Some(note) = response.note {
        return Err(SourceError::rate_limited(format!(
            "alphavantage throttled the request: {note}"
        )));
    }

    if let Some(message) = response.error_message {
        return Err(SourceError::no_data(format!(
            "alphavantage reported no data for {symbol}: {message}"
        )));
    }

    let series = response
        .series
        .ok_or_else(|| SourceError::no_data(format!("no daily series for {symbol}")))?;

    let mut records = Vec::with_capacity(series.len());
    for (date_str, bar) in &series {
        match parse_daily_row(date_str, bar) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!("skipping malformed alphavantage row for {symbol} at {date_str}: {reason}");
            }
        }
    }

    if records.is_empty() {
        return Err(SourceError::no_data(format!("no daily series for {symbol}")));
    }

    // BTreeMap iteration yields ascending ISO dates; the source contract is
    // descending (provider order), so flip.
    records.reverse();
    Ok(records)
}

fn parse_daily_row(date_str: &str, bar: &RawDailyBar) -> Result<DailyRecord, String> {
    let date = TradingDate::parse(date_str).map_err(|e| e.to_string())?;
    let close: f64 = bar
        .close
        .trim()
        .parse()
        .map_err(|_| format!("unparseable close '{}'", bar.close))?;
    let volume: u64 = bar
        .volume
        .trim()
        .parse()
        .map_err(|_| format!("unparseable volume '{}'", bar.volume))?;

    DailyRecord::new(date, close, volume).map_err(|e| e.to_string())
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)", default)]
    series: Option<BTreeMap<String, RawDailyBar>>,
    #[serde(rename = "Error Message", default)]
    error_message: Option<String>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDailyBar {
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::source::SourceErrorKind;
    use crate::Symbol;
    use std::sync::Mutex;

    const DAILY_BODY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "AAPL"
        },
        "Time Series (Daily)": {
            "2024-03-08": {
                "1. open": "152.10",
                "2. high": "154.00",
                "3. low": "151.80",
                "4. close": "153.00",
                "5. volume": "1200"
            },
            "2024-03-07": {
                "1. open": "149.90",
                "2. high": "151.00",
                "3. low": "149.20",
                "4. close": "150.00",
                "5. volume": "1000"
            }
        }
    }"#;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn with_body(body: &str) -> Self {
            Self {
                response: Ok(HttpResponse::ok_json(body)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn with_error(error: HttpError) -> Self {
            Self {
                response: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn request_for(symbol: &str) -> SeriesRequest {
        SeriesRequest::new(Symbol::parse(symbol).expect("valid symbol"))
    }

    #[tokio::test]
    async fn parses_daily_series_newest_first() {
        let client = Arc::new(RecordingHttpClient::with_body(DAILY_BODY));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        let records = source
            .daily_series(request_for("AAPL"))
            .await
            .expect("series should parse");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date().format(), "2024-03-08");
        assert_eq!(records[0].close(), 153.0);
        assert_eq!(records[0].volume(), 1200);
        assert_eq!(records[1].date().format(), "2024-03-07");
    }

    #[tokio::test]
    async fn request_url_carries_function_symbol_and_api_key() {
        let client = Arc::new(RecordingHttpClient::with_body(DAILY_BODY));
        let source = AlphaVantageSource::with_http_client(client.clone(), "alpha-key");

        source
            .daily_series(request_for("MSFT"))
            .await
            .expect("series should parse");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("function=TIME_SERIES_DAILY"));
        assert!(requests[0].url.contains("symbol=MSFT"));
        assert!(requests[0].url.contains("apikey=alpha-key"));
    }

    #[tokio::test]
    async fn error_message_body_maps_to_no_data() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        let client = Arc::new(RecordingHttpClient::with_body(body));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        let error = source
            .daily_series(request_for("NOPE"))
            .await
            .expect_err("unknown symbol should fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
    }

    #[tokio::test]
    async fn note_body_maps_to_rate_limited() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! 5 calls per minute."}"#;
        let client = Arc::new(RecordingHttpClient::with_body(body));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        let error = source
            .daily_series(request_for("AAPL"))
            .await
            .expect_err("quota note should fail");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn empty_object_body_maps_to_no_data() {
        let client = Arc::new(RecordingHttpClient::with_body("{}"));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        let error = source
            .daily_series(request_for("AAPL"))
            .await
            .expect_err("empty body should fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped_not_fatal() {
        let body = r#"{
            "Time Series (Daily)": {
                "2024-03-08": {"4. close": "153.00", "5. volume": "1200"},
                "2024-03-07": {"4. close": "not-a-number", "5. volume": "1000"},
                "not-a-date": {"4. close": "150.00", "5. volume": "900"}
            }
        }"#;
        let client = Arc::new(RecordingHttpClient::with_body(body));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        let records = source
            .daily_series(request_for("AAPL"))
            .await
            .expect("good rows should survive");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].close(), 153.0);
    }

    #[tokio::test]
    async fn retryable_transport_failure_maps_to_unavailable() {
        let client = Arc::new(RecordingHttpClient::with_error(HttpError::Connect {
            detail: String::from("connection refused"),
        }));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        let error = source
            .daily_series(request_for("AAPL"))
            .await
            .expect_err("transport failed");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn non_retryable_transport_failure_maps_to_internal() {
        let client = Arc::new(RecordingHttpClient::with_error(HttpError::Transport {
            detail: String::from("stream reset mid-body"),
        }));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        let error = source
            .daily_series(request_for("AAPL"))
            .await
            .expect_err("transport failed");
        assert_eq!(error.kind(), SourceErrorKind::Internal);
    }

    #[tokio::test]
    async fn sixth_call_in_a_minute_is_rate_limited() {
        let client = Arc::new(RecordingHttpClient::with_body(DAILY_BODY));
        let source = AlphaVantageSource::with_http_client(client, "test-key");

        for _ in 0..5 {
            let result = source.daily_series(request_for("AAPL")).await;
            assert!(result.is_ok());
        }

        let error = source
            .daily_series(request_for("AAPL"))
            .await
            .expect_err("sixth call should rate limit");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    }
}
