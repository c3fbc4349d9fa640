//! Logging and client setup for the examples

use crate::{
    client::{self, Client, ClientArgs},
    LogFilter, LogFormat, LogInitError,
};
use kube_core::{ApiResource, ClusterResourceScope, DynamicObject, NamespaceResourceScope, Resource};

pub use kube_client::Api;

/// Configures a [`Runtime`]
#[derive(Debug, Default)]
#[must_use]
pub struct Builder {
    client: Option<ClientArgs>,
    log: Option<LogSettings>,
}

/// Holds the Kubernetes client used by every example.
///
/// The same client backs typed APIs for built-in kinds and dynamic APIs for
/// custom resources.
#[derive(Clone)]
pub struct Runtime {
    client: Client,
}

/// Indicates that the [`Builder`] could not configure a [`Runtime`]
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Indicates that logging could not be initialized
    #[error(transparent)]
    LogInit(#[from] LogInitError),

    /// Indicates that the Kubernetes client could not be initialized.
    #[error(transparent)]
    Client(#[from] client::ConfigError),
}

#[derive(Debug)]
struct LogSettings {
    filter: LogFilter,
    format: LogFormat,
}

// === impl Builder ===

impl Builder {
    /// Configures the runtime to use the given [`ClientArgs`]
    pub fn with_client(mut self, client: ClientArgs) -> Self {
        self.client = Some(client);
        self
    }

    /// Configures the runtime to use the given logging configuration
    pub fn with_log(mut self, filter: LogFilter, format: LogFormat) -> Self {
        self.log = Some(LogSettings { filter, format });
        self
    }

    /// Attempts to build a runtime by initializing logs and loading the Kubernetes client
    pub async fn build(self) -> Result<Runtime, BuildError> {
        if let Some(log) = self.log {
            log.format.try_init(log.filter)?;
        }
        let client = self.client.unwrap_or_default().try_client().await?;
        Ok(Runtime { client })
    }
}

// === impl Runtime ===

impl Runtime {
    /// Creates a new runtime [`Builder`]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Wraps an existing client, skipping kubeconfig loading.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Obtains the runtime's Kubernetes client.
    #[inline]
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Obtains a typed API for a namespaced resource kind
    pub fn namespaced<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client(), namespace)
    }

    /// Obtains a typed API for a cluster-scoped resource kind
    pub fn cluster<K>(&self) -> Api<K>
    where
        K: Resource<Scope = ClusterResourceScope>,
        K::DynamicType: Default,
    {
        Api::all(self.client())
    }

    /// Obtains a dynamic API for the resource described by `resource`
    pub fn dynamic(&self, namespace: &str, resource: &ApiResource) -> Api<DynamicObject> {
        Api::namespaced_with(self.client(), namespace, resource)
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}
