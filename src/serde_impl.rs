//! Serde support for strategy and retry configuration (feature-gated)
//!
//! Durations are written as whole milliseconds so configuration files stay
//! readable:
//!
//! ```rust,ignore
//! use backwater::RetryConfig;
//!
//! let json = r#"{
//!     "strategy": { "kind": "exponential", "base_ms": 100, "factor": 3, "max_delay_ms": 5000 },
//!     "max_attempts": 5,
//!     "timeout_ms": 30000
//! }"#;
//! let config: RetryConfig = serde_json::from_str(json).unwrap();
//! ```

use serde::{Deserialize, Deserializer};

/// `Duration` as integer milliseconds.
///
/// Durations with a sub-millisecond part are rejected rather than truncated.
pub(crate) mod millis {
    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(crate) fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if d.subsec_nanos() % 1_000_000 != 0 {
            return Err(S::Error::custom(format!(
                "{:?} is not a whole number of milliseconds",
                d
            )));
        }
        let millis = u64::try_from(d.as_millis())
            .map_err(|_| S::Error::custom(format!("{:?} overflows u64 milliseconds", d)))?;
        serializer.serialize_u64(millis)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// `Option<Duration>` as integer milliseconds or `null`.
pub(crate) mod option_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(crate) fn serialize<S: Serializer>(
        d: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => super::millis::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

/// Growth factors below 2 are raised to 2, as in `Exponential::with_factor`.
pub(crate) fn factor_at_least_two<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(u64::deserialize(deserializer)?.max(2))
}
