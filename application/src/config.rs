//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as the timeout for language-intelligence requests.

use std::time::Duration;

/// Application behavior configuration.
///
/// Controls runtime behavior of use cases like the timeout applied to
/// completion and hover requests.
#[derive(Debug, Clone, Default)]
pub struct BehaviorConfig {
    /// Maximum time to wait for a language server response.
    pub request_timeout: Option<Duration>,
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(seconds)),
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            request_timeout: seconds.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_optional_seconds() {
        assert_eq!(BehaviorConfig::from_timeout_seconds(None).request_timeout, None);
        assert_eq!(
            BehaviorConfig::from_timeout_seconds(Some(5)).request_timeout,
            Some(Duration::from_secs(5))
        );
    }
}
