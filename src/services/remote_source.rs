//! Remote Data Source
//!
//! Fetches worklist rows from an HTTP endpoint. Query state travels as
//! query-string parameters:
//!
//! ```text
//! GET <endpoint>?search=<text>&sortBy=<key>&sortOrder=<asc|desc>&filter[<key>]=<text>
//! ```
//!
//! The response body must be a JSON array of row objects.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::data_table::accessor::Row;
use crate::data_table::query::QueryState;
use crate::error::{Error, Result};

/// HTTP-backed data source
#[derive(Clone)]
pub struct RemoteSource {
    endpoint: Url,
    client: reqwest::Client,
}

impl RemoteSource {
    /// Create a remote source; `timeout` bounds each request
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| Error::Configuration {
            message: format!("invalid endpoint {endpoint}: {e}"),
        })?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the request URL for a query. Empty parts are left out.
    pub fn request_url(&self, query: &QueryState) -> Url {
        let mut params: Vec<(String, &str)> = Vec::new();

        if !query.global_search.is_empty() {
            params.push(("search".into(), query.global_search.as_str()));
        }
        if let Some(key) = query.sort_config.active_key() {
            params.push(("sortBy".into(), key));
            params.push(("sortOrder".into(), query.sort_config.direction.as_str()));
        }
        for (key, text) in query.filters.active() {
            params.push((format!("filter[{key}]"), text));
        }

        let mut url = self.endpoint.clone();
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), *v)));
        }
        url
    }

    /// GET the rows matching `query`
    pub async fn fetch(&self, query: &QueryState) -> Result<Vec<Row>> {
        let url = self.request_url(query);
        tracing::debug!(%url, "Fetching worklist rows");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Worklist endpoint returned an error");
            return Err(Error::Network {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string(),
            });
        }

        let rows: Vec<Row> = response.json().await?;
        tracing::debug!(rows = rows.len(), "Worklist rows received");
        Ok(rows)
    }
}

impl fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSource")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_table::query::SortDirection;
    use crate::data_table::Column;
    use crate::state::WorklistState;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response; yields the request line that was received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::sync::oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request = String::from_utf8_lossy(&buf);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
            let _ = tx.send(request_line);
        });

        (format!("http://{addr}/rows"), rx)
    }

    #[test]
    fn request_url_carries_query_state() {
        let source = RemoteSource::new("http://localhost/api/orders", Duration::from_secs(1))
            .expect("valid endpoint");
        let query = QueryState::default()
            .with_search("john doe")
            .with_sort("amount", SortDirection::Desc)
            .with_filter("status", "Complete")
            .with_filter("empty", "");

        let url = source.request_url(&query);
        assert_eq!(
            url.as_str(),
            "http://localhost/api/orders?search=john+doe&sortBy=amount&sortOrder=desc&filter%5Bstatus%5D=Complete"
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("filter[status]".to_string(), "Complete".to_string())));
    }

    #[test]
    fn request_url_without_state_has_no_query() {
        let source = RemoteSource::new("http://localhost/api/orders", Duration::from_secs(1))
            .expect("valid endpoint");
        let url = source.request_url(&QueryState::default());
        assert_eq!(url.as_str(), "http://localhost/api/orders");
    }

    #[test]
    fn invalid_endpoint_is_configuration_error() {
        let err = RemoteSource::new("not a url", Duration::from_secs(1)).expect_err("invalid");
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn fetch_parses_rows() {
        let (endpoint, request) = serve_once("200 OK", r#"[{"id":1,"status":"Complete"},{"id":2}]"#).await;
        let source = RemoteSource::new(&endpoint, Duration::from_secs(5)).expect("endpoint");

        let rows = source
            .fetch(&QueryState::default().with_search("doe"))
            .await
            .expect("fetch");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["status"], "Complete");

        let request_line = request.await.expect("request line");
        assert!(request_line.starts_with("GET /rows?search=doe "), "{request_line}");
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let (endpoint, _request) = serve_once("500 Internal Server Error", "oops").await;
        let source = RemoteSource::new(&endpoint, Duration::from_secs(5)).expect("endpoint");

        let err = source.fetch(&QueryState::default()).await.expect_err("500");
        match err {
            Error::Network { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn body_that_is_not_a_row_array_is_a_recoverable_error() {
        let (endpoint, _request) = serve_once("200 OK", r#"{"rows":[]}"#).await;
        let source = RemoteSource::new(&endpoint, Duration::from_secs(5)).expect("endpoint");

        let err = source.fetch(&QueryState::default()).await.expect_err("not an array");
        assert!(matches!(err, Error::Request { .. }));
        assert!(err.is_recoverable());

        let mut state = WorklistState::new(vec![Column::new("id", "ID", "id")], 10).expect("state");
        let seq = state.begin_fetch();
        assert!(state.commit(seq, Err(err)));
        let message = state.load_state().error_message().map(str::to_string);
        assert!(message.is_some_and(|m| m.starts_with("Request error:")));
        assert!(!state.load_state().is_fatal());
        assert!(state.rows().is_empty());
    }
}
