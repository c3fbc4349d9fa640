//! Errors returned by workload operations

use kube_core::ErrorResponse;

/// The API call that failed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verb {
    /// `POST` of a new object
    Create,
    /// `PUT` of an existing object
    Update,
    /// `GET` of a collection
    List,
    /// `GET` of a single object
    Get,
    /// `DELETE` of a single object
    Delete,
}

/// Indicates a failed workload operation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Kubernetes API rejected or failed a request
    #[error("failed to {verb} {kind} {name}: {source}")]
    Api {
        /// The call that failed.
        verb: Verb,
        /// The resource kind.
        kind: String,
        /// The object name, or `*` for collection calls.
        name: String,
        /// The client error.
        #[source]
        source: kube_client::Error,
    },

    /// An object returned by the API is missing a required field
    #[error("{kind} is missing {field}")]
    MissingField {
        /// The resource kind.
        kind: String,
        /// The missing field path.
        field: &'static str,
    },

    /// A field could not be set on a dynamic object
    #[error("cannot set {path}: {reason}")]
    Unstructured {
        /// The field path being set.
        path: String,
        /// Why the field could not be set.
        reason: &'static str,
    },
}

/// Returns true if the client error is an API response with a 404 status.
pub fn is_not_found(error: &kube_client::Error) -> bool {
    matches!(error, kube_client::Error::Api(ErrorResponse { code: 404, .. }))
}

// === impl Verb ===

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::List => "list",
            Self::Get => "get",
            Self::Delete => "delete",
        })
    }
}

// === impl Error ===

impl Error {
    pub(crate) fn api(
        verb: Verb,
        kind: impl Into<String>,
        name: impl Into<String>,
        source: kube_client::Error,
    ) -> Self {
        Self::Api {
            verb,
            kind: kind.into(),
            name: name.into(),
            source,
        }
    }

    /// Returns true if this error wraps a not-found API response.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { source, .. } => is_not_found(source),
            _ => false,
        }
    }
}
