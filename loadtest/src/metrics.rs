use crate::harness::{ExitStatus, TransactionStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tracing::info;

const LATENCY_BUCKET_COUNT: usize = 12;
const LATENCY_BUCKETS_MS: [u64; LATENCY_BUCKET_COUNT] =
    [1, 2, 5, 10, 25, 50, 100, 250, 500, 1000, 2500, 5000];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LatencySnapshot {
    pub buckets_ms: Vec<u64>,
    pub counts: Vec<u64>,
    pub overflow: u64,
    pub count: u64,
    pub avg_ms: f64,
    pub max_ms: u64,
}

#[derive(Default)]
struct LatencyMetrics {
    buckets: [AtomicU64; LATENCY_BUCKET_COUNT],
    overflow: AtomicU64,
    count: AtomicU64,
    total_ms: AtomicU64,
    max_ms: AtomicU64,
}

impl LatencyMetrics {
    fn record(&self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ms.fetch_add(ms, Ordering::Relaxed);
        self.max_ms.fetch_max(ms, Ordering::Relaxed);

        match LATENCY_BUCKETS_MS.iter().position(|bucket| ms <= *bucket) {
            Some(idx) => self.buckets[idx].fetch_add(1, Ordering::Relaxed),
            None => self.overflow.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn snapshot(&self) -> LatencySnapshot {
        let count = self.count.load(Ordering::Relaxed);
        let total_ms = self.total_ms.load(Ordering::Relaxed);
        let avg_ms = if count > 0 {
            total_ms as f64 / count as f64
        } else {
            0.0
        };

        LatencySnapshot {
            buckets_ms: LATENCY_BUCKETS_MS.to_vec(),
            counts: self
                .buckets
                .iter()
                .map(|bucket| bucket.load(Ordering::Relaxed))
                .collect(),
            overflow: self.overflow.load(Ordering::Relaxed),
            count,
            avg_ms,
            max_ms: self.max_ms.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TransactionSnapshot {
    pub passed: u64,
    pub failed: u64,
    pub latency: LatencySnapshot,
}

#[derive(Default)]
struct TransactionMetrics {
    passed: AtomicU64,
    failed: AtomicU64,
    latency: LatencyMetrics,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub iterations_passed: u64,
    pub iterations_failed: u64,
    pub iterations_errored: u64,
    /// Planned iterations that never finished (shutdown or a panicked task).
    pub iterations_aborted: u64,
    pub requests: u64,
    pub request_errors: u64,
    pub non_success_responses: u64,
    pub http: LatencySnapshot,
    pub transactions: BTreeMap<String, TransactionSnapshot>,
}

impl RunSnapshot {
    pub fn iterations(&self) -> u64 {
        self.iterations_passed + self.unsuccessful()
    }

    pub fn unsuccessful(&self) -> u64 {
        self.iterations_failed + self.iterations_errored + self.iterations_aborted
    }
}

/// Counters shared by every virtual user of a run.
#[derive(Default)]
pub struct RunMetrics {
    iterations_passed: AtomicU64,
    iterations_failed: AtomicU64,
    iterations_errored: AtomicU64,
    iterations_aborted: AtomicU64,
    requests: AtomicU64,
    request_errors: AtomicU64,
    non_success_responses: AtomicU64,
    http: LatencyMetrics,
    transactions: RwLock<BTreeMap<&'static str, TransactionMetrics>>,
}

impl RunMetrics {
    pub fn record_transaction(
        &self,
        name: &'static str,
        status: TransactionStatus,
        elapsed: Duration,
    ) {
        let record = |metrics: &TransactionMetrics| {
            match status {
                TransactionStatus::Pass => metrics.passed.fetch_add(1, Ordering::Relaxed),
                TransactionStatus::Fail => metrics.failed.fetch_add(1, Ordering::Relaxed),
            };
            metrics.latency.record(elapsed);
        };

        {
            let transactions = self
                .transactions
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(metrics) = transactions.get(name) {
                record(metrics);
                return;
            }
        }
        let mut transactions = self
            .transactions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        record(&*transactions.entry(name).or_default());
    }

    pub fn record_response(&self, success: bool, elapsed: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.non_success_responses.fetch_add(1, Ordering::Relaxed);
        }
        self.http.record(elapsed);
    }

    pub fn record_request_error(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.request_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_iteration(&self, status: ExitStatus) {
        match status {
            ExitStatus::Passed => self.iterations_passed.fetch_add(1, Ordering::Relaxed),
            ExitStatus::Failed => self.iterations_failed.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// An iteration that could not run to completion (bad config, encode failure).
    pub fn record_iteration_error(&self) {
        self.iterations_errored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_iterations_aborted(&self, count: u64) {
        self.iterations_aborted.fetch_add(count, Ordering::Relaxed);
    }

    /// Iterations that ran to an exit status or an error.
    pub fn iterations_finished(&self) -> u64 {
        self.iterations_passed.load(Ordering::Relaxed)
            + self.iterations_failed.load(Ordering::Relaxed)
            + self.iterations_errored.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let transactions = self
            .transactions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(name, metrics)| {
                (
                    (*name).to_string(),
                    TransactionSnapshot {
                        passed: metrics.passed.load(Ordering::Relaxed),
                        failed: metrics.failed.load(Ordering::Relaxed),
                        latency: metrics.latency.snapshot(),
                    },
                )
            })
            .collect();

        RunSnapshot {
            iterations_passed: self.iterations_passed.load(Ordering::Relaxed),
            iterations_failed: self.iterations_failed.load(Ordering::Relaxed),
            iterations_errored: self.iterations_errored.load(Ordering::Relaxed),
            iterations_aborted: self.iterations_aborted.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            request_errors: self.request_errors.load(Ordering::Relaxed),
            non_success_responses: self.non_success_responses.load(Ordering::Relaxed),
            http: self.http.snapshot(),
            transactions,
        }
    }
}

/// Log a run summary, one line per transaction.
pub fn log_summary(snapshot: &RunSnapshot, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    let rps = if secs > 0.0 {
        snapshot.requests as f64 / secs
    } else {
        0.0
    };
    info!(
        elapsed_secs = %format!("{secs:.2}"),
        iterations = snapshot.iterations(),
        passed = snapshot.iterations_passed,
        failed = snapshot.iterations_failed,
        errored = snapshot.iterations_errored,
        aborted = snapshot.iterations_aborted,
        requests = snapshot.requests,
        request_errors = snapshot.request_errors,
        non_success = snapshot.non_success_responses,
        rps = %format!("{rps:.2}"),
        avg_ms = %format!("{:.2}", snapshot.http.avg_ms),
        max_ms = snapshot.http.max_ms,
        "Load test summary"
    );
    for (name, tx) in &snapshot.transactions {
        info!(
            transaction = name.as_str(),
            passed = tx.passed,
            failed = tx.failed,
            avg_ms = %format!("{:.2}", tx.latency.avg_ms),
            max_ms = tx.latency.max_ms,
            "Transaction summary"
        );
    }
}
