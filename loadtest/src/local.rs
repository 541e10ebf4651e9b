use crate::harness::{Harness, RequestSpec, TransactionStatus};
use crate::metrics::RunMetrics;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use vegas_client::{Client, Response};

/// Drives a virtual user over real HTTP with the shared [Client].
pub struct LocalHarness {
    vuser_id: u32,
    client: Client,
    metrics: Arc<RunMetrics>,
    think_time_scale: f64,
    open: HashMap<&'static str, Instant>,
}

impl LocalHarness {
    pub fn new(
        vuser_id: u32,
        client: Client,
        metrics: Arc<RunMetrics>,
        think_time_scale: f64,
    ) -> Self {
        Self {
            vuser_id,
            client,
            metrics,
            think_time_scale,
            open: HashMap::new(),
        }
    }
}

impl Harness for LocalHarness {
    fn vuser_id(&self) -> u32 {
        self.vuser_id
    }

    fn start_transaction(&mut self, name: &'static str) {
        if self.open.insert(name, Instant::now()).is_some() {
            warn!(vuser = self.vuser_id, transaction = name, "Transaction restarted while open");
        }
    }

    fn end_transaction(&mut self, name: &'static str, status: TransactionStatus) {
        let Some(started) = self.open.remove(name) else {
            warn!(vuser = self.vuser_id, transaction = name, "Transaction ended without start");
            return;
        };
        let elapsed = started.elapsed();
        debug!(vuser = self.vuser_id, transaction = name, ?status, ?elapsed, "Transaction closed");
        self.metrics.record_transaction(name, status, elapsed);
    }

    async fn think(&mut self, pause: Duration) {
        let scaled = pause.as_secs_f64() * self.think_time_scale;
        let pause = match Duration::try_from_secs_f64(scaled) {
            Ok(pause) => pause,
            Err(err) => {
                warn!(vuser = self.vuser_id, scaled, %err, "Skipping unrepresentable think time");
                return;
            }
        };
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    async fn issue_request(&mut self, request: RequestSpec) -> vegas_client::Result<Response> {
        let result = self
            .client
            .post(&request.url, &request.headers, request.body)
            .await;
        match &result {
            Ok(response) => self
                .metrics
                .record_response(response.is_success(), response.elapsed),
            Err(_) => self.metrics.record_request_error(),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transactions_recorded_once_closed() {
        let metrics = Arc::new(RunMetrics::default());
        let client = Client::new(Duration::from_secs(1)).unwrap();
        let mut harness = LocalHarness::new(3, client, metrics.clone(), 0.0);

        harness.start_transaction("Slots_Spin");
        assert!(metrics.snapshot().transactions.is_empty());
        harness.end_transaction("Slots_Spin", TransactionStatus::Fail);
        harness.end_transaction("Dice_Roll", TransactionStatus::Pass);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.transactions["Slots_Spin"].failed, 1);
    }

    #[tokio::test]
    async fn test_zero_scale_skips_sleep() {
        let metrics = Arc::new(RunMetrics::default());
        let client = Client::new(Duration::from_secs(1)).unwrap();
        let mut harness = LocalHarness::new(1, client, metrics, 0.0);

        let start = Instant::now();
        harness.think(Duration::from_secs(5)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scaled_think_time() {
        let metrics = Arc::new(RunMetrics::default());
        let client = Client::new(Duration::from_secs(1)).unwrap();
        let mut harness = LocalHarness::new(1, client, metrics, 0.5);

        let start = tokio::time::Instant::now();
        harness.think(Duration::from_secs(4)).await;
        assert_eq!(start.elapsed().as_secs(), 2);
    }

    #[tokio::test]
    async fn test_unrepresentable_think_time_is_skipped() {
        let metrics = Arc::new(RunMetrics::default());
        let client = Client::new(Duration::from_secs(1)).unwrap();
        let mut harness = LocalHarness::new(1, client, metrics, 1e300);

        let start = Instant::now();
        harness.think(Duration::from_secs(5)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_transport_error_counted() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let metrics = Arc::new(RunMetrics::default());
        let client = Client::new(Duration::from_secs(2)).unwrap();
        let mut harness = LocalHarness::new(1, client, metrics.clone(), 0.0);
        let result = harness
            .issue_request(RequestSpec {
                name: "Dice_Roll_Request",
                url: format!("http://{addr}/api/dice/roll"),
                headers: vegas_client::session_headers(),
                body: b"{}".to_vec(),
            })
            .await;
        assert!(result.is_err());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 1);
        assert_eq!(snapshot.request_errors, 1);
    }
}
