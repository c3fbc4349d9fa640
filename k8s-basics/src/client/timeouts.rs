use kube_core::Duration as KubeDuration;
use std::time::Duration;

/// A timeout applied to Kubernetes API responses.
///
/// Parsed from Kubernetes-style duration strings like `30s` or `2h3m4s5ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTimeout(Duration);

// === impl RequestTimeout ===

impl RequestTimeout {
    /// Wraps the given duration.
    pub const fn new(timeout: Duration) -> Self {
        Self(timeout)
    }

    /// Returns the wrapped duration.
    pub const fn duration(&self) -> Duration {
        self.0
    }
}

impl From<RequestTimeout> for Duration {
    fn from(RequestTimeout(timeout): RequestTimeout) -> Self {
        timeout
    }
}

impl std::str::FromStr for RequestTimeout {
    type Err = <KubeDuration as std::str::FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<KubeDuration>()?.into()))
    }
}

impl std::fmt::Display for RequestTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        KubeDuration::from(self.0).fmt(f)
    }
}
