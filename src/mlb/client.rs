//! HTTP client for the MLB Stats API transactions endpoint.

use crate::data::models::{PlayerId, TeamId, TransactionRecord};
use crate::mlb::errors::FetchError;
use crate::mlb::json::parse_json_with_context;
use crate::mlb::models::TransactionsResponse;
use crate::mlb::TransactionSource;
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, trace};

/// Public transactions endpoint.
pub const DEFAULT_TRANSACTIONS_URL: &str = "https://statsapi.mlb.com/api/v1/transactions";

pub struct MlbClient {
    http: reqwest::Client,
    transactions_url: String,
}

impl MlbClient {
    /// Build a client whose idle pool holds twice `max_concurrent` connections,
    /// so the coordinator's admission gate stays the only throttle.
    pub fn new(
        transactions_url: impl Into<String>,
        timeout: Duration,
        max_concurrent: usize,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_concurrent.saturating_mul(2))
            .user_agent(concat!("history-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            transactions_url: transactions_url.into(),
        })
    }

    pub fn transactions_url(&self) -> &str {
        &self.transactions_url
    }
}

#[async_trait]
impl TransactionSource for MlbClient {
    async fn fetch_transactions(
        &self,
        player: PlayerId,
        valid_teams: &HashSet<TeamId>,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        trace!(player = %player, "Fetching transactions");

        let response = self
            .http
            .get(&self.transactions_url)
            .query(&[("playerId", player.0)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let url = response.url().to_string();
        let body = response.text().await?;
        let parsed: TransactionsResponse =
            parse_json_with_context(&body).map_err(|source| FetchError::Parse { url, source })?;

        let total = parsed.transactions.len();
        let records = parsed.into_records(player, valid_teams);
        debug!(
            player = %player,
            entries = total,
            kept = records.len(),
            "Fetched transactions"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TRANSACTIONS_PATH: &str = "/api/v1/transactions";

    async fn setup() -> (MockServer, MlbClient) {
        let server = MockServer::start().await;
        let client = MlbClient::new(
            format!("{}{TRANSACTIONS_PATH}", server.uri()),
            Duration::from_millis(500),
            10,
        )
        .unwrap();
        (server, client)
    }

    fn valid_teams() -> HashSet<TeamId> {
        [TeamId(100), TeamId(101)].into_iter().collect()
    }

    #[tokio::test]
    async fn test_fetch_filters_entries() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path(TRANSACTIONS_PATH))
            .and(query_param("playerId", "660271"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "copyright": "Copyright MLB",
                "transactions": [
                    { "toTeam": { "id": 100 }, "date": "2023-06-17", "description": "Activated." },
                    { "toTeam": { "id": 999 }, "date": "2023-06-18", "description": "Elsewhere." },
                    { "fromTeam": { "id": 101 }, "date": "2023-06-19" },
                    { "toTeam": { "id": 101 }, "date": "not-a-date" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = client
            .fetch_transactions(PlayerId(660271), &valid_teams())
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].team, TeamId(100));
        assert_eq!(records[0].description, "Activated.");
    }

    #[tokio::test]
    async fn test_mistyped_entries_are_skipped_not_fatal() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path(TRANSACTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactions": [
                    { "toTeam": { "id": 100 }, "date": "2023-06-17", "description": "Kept." },
                    { "toTeam": { "id": 100 }, "date": 20230618 },
                    { "toTeam": { "id": "abc" }, "date": "2023-06-19" }
                ]
            })))
            .mount(&server)
            .await;

        let records = client
            .fetch_transactions(PlayerId(1), &valid_teams())
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "Kept.");
    }

    #[tokio::test]
    async fn test_server_error_is_status_failure() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path(TRANSACTIONS_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client
            .fetch_transactions(PlayerId(1), &valid_teams())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503 }), "{err:?}");
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_failure() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path(TRANSACTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"transactions\": ["))
            .mount(&server)
            .await;

        let err = client
            .fetch_transactions(PlayerId(1), &valid_teams())
            .await
            .unwrap_err();
        match err {
            FetchError::Parse { url, .. } => assert!(url.contains("playerId=1"), "{url}"),
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path(TRANSACTIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "transactions": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client
            .fetch_transactions(PlayerId(1), &valid_teams())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout), "{err:?}");
    }

    #[tokio::test]
    async fn test_empty_payload_yields_no_records() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path(TRANSACTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let records = client
            .fetch_transactions(PlayerId(1), &valid_teams())
            .await
            .unwrap();
        assert!(records.is_empty());
    }
}
