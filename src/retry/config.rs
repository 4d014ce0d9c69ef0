//! Retry configuration as plain data.

use std::time::Duration;

use crate::backoff::DelayStrategy;

use super::retrier::Retrier;

/// Everything needed to build a [`Retrier`] over a [`DelayStrategy`].
///
/// With the `serde` feature this is the shape to embed in application
/// configuration; every field is optional and falls back to
/// [`RetryConfig::default`]. Durations are whole milliseconds; serializing
/// one with a sub-millisecond part is an error.
///
/// # Examples
///
/// ```rust
/// use backwater::{DelayStrategy, RetryConfig};
/// use std::time::Duration;
///
/// let retrier = RetryConfig {
///     strategy: DelayStrategy::constant(Duration::from_millis(10)),
///     max_attempts: 3,
///     timeout: Some(Duration::from_secs(1)),
/// }
/// .into_retrier();
///
/// assert_eq!(retrier.max_attempts(), 3);
/// assert_eq!(retrier.timeout(), Some(Duration::from_secs(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryConfig {
    /// How long to wait between attempts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: DelayStrategy,
    /// Total attempts including the first; `0` means unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_attempts: u32,
    /// Deadline for a whole run.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "timeout_ms",
            default,
            with = "crate::serde_impl::option_millis"
        )
    )]
    pub timeout: Option<Duration>,
}

impl RetryConfig {
    /// Build a retrier drawing jitter from the thread-local generator.
    pub fn into_retrier(self) -> Retrier {
        Retrier::from_config(self)
    }
}

impl Retrier {
    /// Build a retrier from plain configuration.
    pub fn from_config(config: RetryConfig) -> Self {
        let retrier = Retrier::new(config.strategy).with_max_attempts(config.max_attempts);
        match config.timeout {
            Some(timeout) => retrier.with_timeout(timeout),
            None => retrier,
        }
    }
}

impl From<RetryConfig> for Retrier {
    fn from(config: RetryConfig) -> Self {
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.strategy, DelayStrategy::default());
        assert_eq!(config.max_attempts, 0);
        assert_eq!(config.timeout, None);

        let retrier = config.into_retrier();
        assert_eq!(retrier.max_attempts(), 0);
        assert_eq!(retrier.timeout(), None);
    }

    #[test]
    fn test_from_impl() {
        let config = RetryConfig {
            strategy: DelayStrategy::linear(Duration::from_millis(5)),
            max_attempts: 4,
            timeout: None,
        };
        let retrier: Retrier = config.clone().into();
        assert_eq!(retrier.backoff(), &config.strategy);
        assert_eq!(retrier.max_attempts(), 4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_full() {
        let json = r#"{
            "strategy": { "kind": "exponential", "base_ms": 100, "factor": 3, "max_delay_ms": 5000 },
            "max_attempts": 5,
            "timeout_ms": 30000
        }"#;
        let config: RetryConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            config.strategy,
            crate::Exponential::new(Duration::from_millis(100))
                .with_factor(3)
                .with_max_delay(Duration::from_secs(5))
                .into()
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_empty_object_uses_defaults() {
        let config: RetryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RetryConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_round_trip() {
        let config = RetryConfig {
            strategy: DelayStrategy::constant(Duration::from_millis(250))
                .with_max_jitter(Duration::from_millis(25)),
            max_attempts: 2,
            timeout: Some(Duration::from_millis(1500)),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<RetryConfig>(&json).unwrap(), config);
    }
}
