// Blocking HTTP GET with bounded retries and exponential backoff.
//
// The network and the clock sit behind two small traits so the retry loop
// can be driven without either in tests.

use crate::error::TransportError;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One GET request returning the decoded JSON body.
pub trait Transport {
    fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        (**self).get_json(endpoint, params, timeout)
    }
}

/// Waits between attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// `Transport` backed by a reqwest blocking client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("taxa-lookup/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        debug!(endpoint, ?params, "GET");
        let res = self
            .client
            .get(endpoint)
            .query(params)
            .timeout(timeout)
            .send()?;
        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(res.json::<Value>()?)
    }
}

/// How many times to try and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Wait before retry `n` (counting from 0) is `backoff_unit * 2^n`.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, retry_index: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(2u32.saturating_pow(retry_index))
    }
}

/// Issues GETs through a `Transport`, retrying per a `RetryPolicy`.
pub struct Fetcher<T, S = ThreadSleeper> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
}

impl<T: Transport, S: Sleeper> Fetcher<T, S> {
    pub fn new(transport: T, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    /// Fetch with the policy's attempt count.
    pub fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Option<Value> {
        self.fetch_with_attempts(endpoint, params, self.policy.max_attempts)
    }

    /// Returns the first successful body, or `None` once `max_attempts`
    /// attempts have failed. Each failure is logged.
    pub fn fetch_with_attempts(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        max_attempts: u32,
    ) -> Option<Value> {
        for attempt in 0..max_attempts {
            match self.transport.get_json(endpoint, params, self.policy.timeout) {
                Ok(body) => {
                    if attempt > 0 {
                        debug!(endpoint, attempt = attempt + 1, "request succeeded after retry");
                    }
                    return Some(body);
                }
                Err(err) => {
                    warn!(
                        endpoint,
                        "Attempt {}/{} failed: {}",
                        attempt + 1,
                        max_attempts,
                        err
                    );
                    if attempt + 1 < max_attempts {
                        let wait = self.policy.backoff(attempt);
                        info!("Waiting {:?} before retrying...", wait);
                        self.sleeper.sleep(wait);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    /// Fails the first `failures` calls, then answers `{"ok": true}`.
    struct Flaky {
        failures: u32,
        calls: Cell<u32>,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Cell::new(0),
            }
        }
    }

    impl Transport for Flaky {
        fn get_json(
            &self,
            _endpoint: &str,
            _params: &[(&str, String)],
            _timeout: Duration,
        ) -> Result<Value, TransportError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n < self.failures {
                Err(TransportError::Timeout)
            } else {
                Ok(json!({ "ok": true }))
            }
        }
    }

    #[derive(Default)]
    struct Recorded(RefCell<Vec<Duration>>);

    impl Sleeper for Recorded {
        fn sleep(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    fn unit_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            backoff_unit: Duration::from_secs(1),
        }
    }

    #[test]
    fn always_failing_transport_exhausts_attempts() {
        let transport = Flaky::new(u32::MAX);
        let sleeper = Recorded::default();
        let fetcher = Fetcher::new(&transport, &sleeper, unit_policy());

        let body = fetcher.fetch_with_attempts("http://example.test/x", &[], 4);

        assert_eq!(body, None);
        assert_eq!(transport.calls.get(), 4);
        assert_eq!(
            *sleeper.0.borrow(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[test]
    fn success_after_one_failure_stops_retrying() {
        let transport = Flaky::new(1);
        let sleeper = Recorded::default();
        let fetcher = Fetcher::new(&transport, &sleeper, unit_policy());

        let body = fetcher.fetch("http://example.test/x", &[]);

        assert_eq!(body, Some(json!({ "ok": true })));
        assert_eq!(transport.calls.get(), 2);
        assert_eq!(*sleeper.0.borrow(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn first_try_success_never_sleeps() {
        let transport = Flaky::new(0);
        let sleeper = Recorded::default();
        let fetcher = Fetcher::new(&transport, &sleeper, unit_policy());

        assert!(fetcher.fetch("http://example.test/x", &[]).is_some());
        assert!(sleeper.0.borrow().is_empty());
    }

    #[test]
    fn backoff_doubles_from_the_unit() {
        let policy = RetryPolicy {
            backoff_unit: Duration::from_millis(250),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(250));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
    }
}
