//! Contract between the scenario and whatever drives it.
//!
//! The harness owns virtual-user identity, transaction timing, pauses and the
//! transport. The scenario only calls into it, so the same iteration logic
//! runs under [crate::LocalHarness] or a recording double in tests.

use std::{
    future::Future,
    time::{Duration, SystemTime},
};
use uuid::Uuid;
use vegas_client::{reqwest::header::HeaderMap, Response};

/// Pass/fail verdict reported when a transaction closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    Pass,
    Fail,
}

impl TransactionStatus {
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Overall result of one iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Passed,
    Failed,
}

/// A fully built request, ready for the transport.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    /// Step name used in logs (e.g. `Slots_Spin_Request`).
    pub name: &'static str,
    pub url: String,
    pub headers: HeaderMap,
    /// Encoded JSON body.
    pub body: Vec<u8>,
}

pub trait Harness: Send {
    /// Id of the virtual user running this iteration.
    fn vuser_id(&self) -> u32;

    fn uuid4(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn start_transaction(&mut self, name: &'static str);

    fn end_transaction(&mut self, name: &'static str, status: TransactionStatus);

    /// Pause this virtual user only.
    fn think(&mut self, pause: Duration) -> impl Future<Output = ()> + Send;

    /// Send a request exactly once.
    fn issue_request(
        &mut self,
        request: RequestSpec,
    ) -> impl Future<Output = vegas_client::Result<Response>> + Send;
}
