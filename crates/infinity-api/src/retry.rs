// Retry policy
//
// Decides which attempt outcomes are worth repeating and how long to wait
// between attempts. The engine consults this after every attempt.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;

use crate::error::Error;

/// Exponential backoff with multiplicative jitter.
///
/// `max_retries` counts retries *after* the first attempt, so a call makes
/// at most `max_retries + 1` attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first retry.
    pub backoff_min: Duration,
    /// Cap applied before jitter.
    pub backoff_max: Duration,
    pub multiplier: f64,
    /// Relative spread: the delay varies by up to `±jitter` of itself.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_min: Duration::from_millis(500),
            backoff_max: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.backoff_min = min;
        self.backoff_max = max;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total attempts a persistently failing call makes.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(Error::configuration(format!(
                "retry jitter must be a non-negative number, got {}",
                self.jitter
            )));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(Error::configuration(format!(
                "retry multiplier must be at least 1.0, got {}",
                self.multiplier
            )));
        }
        if self.backoff_min > self.backoff_max {
            return Err(Error::configuration(format!(
                "retry backoff_min ({:?}) exceeds backoff_max ({:?})",
                self.backoff_min, self.backoff_max
            )));
        }
        Ok(())
    }

    /// Delay to wait before retry number `attempt` (1-based).
    ///
    /// `raw = min(backoff_min * multiplier^(attempt-1), backoff_max)`, then
    /// `raw ± raw * jitter`. Attempt 0 waits nothing.
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let raw = (self.backoff_min.as_secs_f64() * self.multiplier.powi(exponent))
            .min(self.backoff_max.as_secs_f64());

        let spread = if self.jitter > 0.0 {
            rand::thread_rng().gen_range(-1.0..=1.0)
        } else {
            0.0
        };
        let jittered = raw + raw * self.jitter * spread;

        if jittered.is_finite() && jittered >= 0.0 {
            Duration::try_from_secs_f64(jittered).unwrap_or(self.backoff_max)
        } else {
            self.backoff_min
        }
    }

    /// Whether an attempt outcome should be retried. See [`is_retriable`].
    pub fn should_retry(&self, status: Option<StatusCode>, error: Option<&Error>) -> bool {
        is_retriable(status, error)
    }
}

/// Statuses the Controller may answer transiently.
pub fn is_retriable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Classify an attempt outcome.
///
/// Caller cancellation and deadlines are never retried, even when wrapped.
/// Transport failures are retried. Otherwise only the transient status set
/// qualifies.
pub fn is_retriable(status: Option<StatusCode>, error: Option<&Error>) -> bool {
    if let Some(err) = error {
        match err.root() {
            Error::Cancelled | Error::DeadlineExceeded => return false,
            Error::Transport(_) => return true,
            Error::Api(api) => return is_retriable_status(api.status),
            _ => {
                if status.is_none() {
                    return false;
                }
            }
        }
    }
    status.is_some_and(is_retriable_status)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::error::ApiError;

    fn policy(jitter: f64) -> RetryPolicy {
        RetryPolicy {
            max_retries: 5,
            backoff_min: Duration::from_millis(100),
            backoff_max: Duration::from_secs(2),
            multiplier: 2.0,
            jitter,
        }
    }

    #[test]
    fn default_policy() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_retries, 3);
        assert_eq!(p.max_attempts(), 4);
        assert!(p.validate().is_ok());
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }

    #[test]
    fn attempt_zero_waits_nothing() {
        assert_eq!(policy(0.5).calculate_backoff(0), Duration::ZERO);
    }

    #[test]
    fn backoff_grows_exponentially_without_jitter() {
        let p = policy(0.0);
        assert_eq!(p.calculate_backoff(1), Duration::from_millis(100));
        assert_eq!(p.calculate_backoff(2), Duration::from_millis(200));
        assert_eq!(p.calculate_backoff(3), Duration::from_millis(400));
    }

    #[test]
    fn backoff_caps_at_max() {
        let p = policy(0.0);
        assert_eq!(p.calculate_backoff(10), Duration::from_secs(2));
        assert_eq!(p.calculate_backoff(u32::MAX), Duration::from_secs(2));
    }

    #[test]
    fn jittered_backoff_stays_in_bounds() {
        let p = policy(0.25);
        for attempt in 1..12 {
            let raw = (0.1 * 2.0_f64.powi(i32::try_from(attempt - 1).unwrap_or(0))).min(2.0);
            let lo = Duration::from_secs_f64(0.1 * 0.75);
            let hi = Duration::from_secs_f64(raw * 1.25 + 1e-9);
            for _ in 0..50 {
                let d = p.calculate_backoff(attempt);
                assert!(d >= lo && d <= hi, "attempt {attempt}: {d:?} not in [{lo:?}, {hi:?}]");
            }
        }
    }

    #[test]
    fn oversized_jitter_never_goes_negative() {
        let p = policy(3.0);
        for _ in 0..200 {
            let d = p.calculate_backoff(1);
            assert!(d <= Duration::from_millis(400));
        }
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(policy(-0.1).validate().is_err());
        assert!(policy(f64::NAN).validate().is_err());
        assert!(policy(0.0).with_multiplier(0.5).validate().is_err());
        assert!(
            policy(0.0)
                .with_backoff(Duration::from_secs(5), Duration::from_secs(1))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn retriable_statuses() {
        for code in [408, 429, 500, 502, 503, 504] {
            let status = StatusCode::from_u16(code).ok();
            assert!(is_retriable(status, None), "{code} should retry");
        }
        for code in [200, 400, 401, 403, 404, 409, 422, 501] {
            let status = StatusCode::from_u16(code).ok();
            assert!(!is_retriable(status, None), "{code} should not retry");
        }
    }

    #[test]
    fn context_errors_never_retry() {
        let status = Some(StatusCode::SERVICE_UNAVAILABLE);
        assert!(!is_retriable(status, Some(&Error::Cancelled)));
        assert!(!is_retriable(None, Some(&Error::DeadlineExceeded)));

        let wrapped = Error::RetriesExhausted {
            attempts: 2,
            source: Box::new(Error::DeadlineExceeded),
        };
        assert!(!is_retriable(status, Some(&wrapped)));
    }

    #[test]
    fn api_errors_follow_their_status() {
        let err = Error::Api(ApiError::from_response(
            StatusCode::TOO_MANY_REQUESTS,
            Bytes::new(),
        ));
        assert!(is_retriable(None, Some(&err)));

        let err = Error::Api(ApiError::from_response(StatusCode::BAD_REQUEST, Bytes::new()));
        assert!(!is_retriable(None, Some(&err)));
    }

    #[test]
    fn decode_errors_do_not_retry() {
        let err = Error::Decode {
            message: "eof".into(),
            body: String::new(),
        };
        assert!(!policy(0.0).should_retry(None, Some(&err)));
    }
}
