//! Log API endpoints

use flowlog_core::dto::log::{
    ExecutionLogsQuery, FlowLogsQuery, FollowLogsQuery, SearchLogsQuery,
};
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::{LogsClient, require_non_empty};

/// Text chunks pushed by the follow endpoint, in arrival order
pub type LogChunkStream = BoxStream<'static, Result<String>>;

impl LogsClient {
    // =============================================================================
    // Execution Logs
    // =============================================================================

    /// Get logs for an execution
    ///
    /// The decoded body is returned unmodified. Depending on the backend this
    /// is an array of log entries or a single entry object.
    ///
    /// # Arguments
    /// * `execution_id` - The execution identifier
    /// * `query` - Optional level, task run, task and attempt filters
    ///
    /// # Example
    /// ```no_run
    /// # use flowlog_client::LogsClient;
    /// # use flowlog_core::dto::log::ExecutionLogsQuery;
    /// # async fn example() -> flowlog_client::Result<()> {
    /// let client = LogsClient::new("http://localhost:8080/api/v1")?;
    /// let logs = client
    ///     .get_execution_logs("abc123", &ExecutionLogsQuery::default())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_execution_logs(
        &self,
        execution_id: &str,
        query: &ExecutionLogsQuery,
    ) -> Result<Value> {
        require_non_empty("execution_id", execution_id)?;

        let url = self.endpoint(&["logs", execution_id])?;
        tracing::debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;

        self.handle_json(response).await
    }

    /// Download logs for an execution as plain text
    ///
    /// # Arguments
    /// * `execution_id` - The execution identifier
    /// * `query` - Optional level, task run, task and attempt filters
    ///
    /// # Returns
    /// The response body, untouched
    pub async fn download_execution_logs(
        &self,
        execution_id: &str,
        query: &ExecutionLogsQuery,
    ) -> Result<String> {
        require_non_empty("execution_id", execution_id)?;

        let url = self.endpoint(&["logs", execution_id, "download"])?;
        tracing::debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;

        self.handle_text(response).await
    }

    /// Delete logs for an execution
    ///
    /// There is no confirmation step and no undo. When the backend answers
    /// with an empty body the result is `{"status": "deleted"}`.
    ///
    /// # Arguments
    /// * `execution_id` - The execution identifier
    /// * `query` - Restricts the deletion to a level, task run, task or attempt
    pub async fn delete_execution_logs(
        &self,
        execution_id: &str,
        query: &ExecutionLogsQuery,
    ) -> Result<Value> {
        require_non_empty("execution_id", execution_id)?;

        let url = self.endpoint(&["logs", execution_id])?;
        tracing::debug!("DELETE {} {:?}", url, query);
        let response = self.client.delete(url).query(query).send().await?;

        self.handle_delete(response).await
    }

    // =============================================================================
    // Search
    // =============================================================================

    /// Search logs across executions
    ///
    /// `page` and `size` are always sent. Dates are passed through unparsed,
    /// so a malformed date surfaces as a backend error.
    ///
    /// # Returns
    /// The decoded search result (`results`, `total` and pagination echoes)
    pub async fn search_logs(&self, query: &SearchLogsQuery) -> Result<Value> {
        let url = self.endpoint(&["logs", "search"])?;
        tracing::debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;

        self.handle_json(response).await
    }

    // =============================================================================
    // Flow Logs
    // =============================================================================

    /// Delete logs for every execution of a flow
    ///
    /// # Arguments
    /// * `namespace` - The flow namespace
    /// * `flow_id` - The flow identifier
    /// * `query` - Restricts the deletion to one trigger
    pub async fn delete_flow_logs(
        &self,
        namespace: &str,
        flow_id: &str,
        query: &FlowLogsQuery,
    ) -> Result<Value> {
        require_non_empty("namespace", namespace)?;
        require_non_empty("flow_id", flow_id)?;

        let url = self.endpoint(&["logs", namespace, flow_id])?;
        tracing::debug!("DELETE {} {:?}", url, query);
        let response = self.client.delete(url).query(query).send().await?;

        self.handle_delete(response).await
    }

    // =============================================================================
    // Follow
    // =============================================================================

    /// Follow logs for an execution, single-shot
    ///
    /// The endpoint is a server-sent event stream. This performs one request
    /// and returns whatever text that response yields; it is not a live feed.
    /// Use [`LogsClient::follow_execution_logs_stream`] to consume events as
    /// they arrive.
    pub async fn follow_execution_logs(
        &self,
        execution_id: &str,
        query: &FollowLogsQuery,
    ) -> Result<String> {
        let response = self.send_follow(execution_id, query).await?;

        self.handle_text(response).await
    }

    /// Follow logs for an execution as a lazy stream of text chunks
    ///
    /// A non-success status fails here, before any chunk is yielded. Chunks
    /// never split a UTF-8 character.
    pub async fn follow_execution_logs_stream(
        &self,
        execution_id: &str,
        query: &FollowLogsQuery,
    ) -> Result<LogChunkStream> {
        let response = self.send_follow(execution_id, query).await?;
        let response = Self::check_status(response).await?;

        // `None` marks the end of the body and flushes any partial character
        let chunks = response
            .bytes_stream()
            .map(Some)
            .chain(stream::once(future::ready(None)))
            .scan(Vec::new(), |pending: &mut Vec<u8>, chunk| {
                let item = match chunk {
                    Some(Ok(bytes)) => {
                        pending.extend_from_slice(&bytes);
                        Ok(drain_utf8(pending))
                    }
                    Some(Err(e)) => Err(ClientError::from(e)),
                    None => Ok(String::from_utf8_lossy(&std::mem::take(pending)).into_owned()),
                };
                future::ready(Some(item))
            })
            .filter(|item| future::ready(!matches!(item, Ok(text) if text.is_empty())));

        Ok(chunks.boxed())
    }

    async fn send_follow(
        &self,
        execution_id: &str,
        query: &FollowLogsQuery,
    ) -> Result<reqwest::Response> {
        require_non_empty("execution_id", execution_id)?;

        let url = self.endpoint(&["logs", execution_id, "follow"])?;
        tracing::debug!("GET {} {:?}", url, query);

        Ok(self.client.get(url).query(query).send().await?)
    }
}

/// Take the longest complete UTF-8 prefix out of `pending`
///
/// A trailing partial character stays buffered for the next chunk. Each
/// invalid sequence is replaced with one U+FFFD, as `from_utf8_lossy` does.
fn drain_utf8(pending: &mut Vec<u8>) -> String {
    let mut text = String::new();

    loop {
        match std::str::from_utf8(pending) {
            Ok(valid) => {
                text.push_str(valid);
                pending.clear();
                return text;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                text.push_str(&String::from_utf8_lossy(&pending[..valid]));

                match e.error_len() {
                    Some(invalid) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        pending.drain(..valid + invalid);
                    }
                    None => {
                        pending.drain(..valid);
                        return text;
                    }
                }
            }
        }
    }
}
