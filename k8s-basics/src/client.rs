//! Kubernetes client bootstrap from a kubeconfig file

use kube_client::config::{KubeConfigOptions, Kubeconfig, KubeconfigError};
use std::path::PathBuf;

mod timeouts;

pub use self::timeouts::RequestTimeout;
pub use kube_client::{Client, Config};

/// Configures how the Kubernetes client is loaded.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ClientArgs {
    /// The path of the kubeconfig file. Defaults to `$HOME/.kube/config`.
    #[cfg_attr(feature = "clap", arg(long = "kubeconf", visible_alias = "kubeconfig"))]
    pub kubeconfig: Option<PathBuf>,

    /// The name of the kubeconfig context to use.
    #[cfg_attr(feature = "clap", arg(long))]
    pub context: Option<String>,

    /// The name of the kubeconfig cluster to use.
    #[cfg_attr(feature = "clap", arg(long))]
    pub cluster: Option<String>,

    /// The name of the kubeconfig user to use.
    #[cfg_attr(feature = "clap", arg(long))]
    pub user: Option<String>,

    /// How long to wait for an API response, e.g. `30s` or `1m30s`.
    #[cfg_attr(feature = "clap", arg(long))]
    pub request_timeout: Option<RequestTimeout>,
}

/// Indicates that the Kubernetes client could not be configured
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The kubeconfig file could not be read or parsed
    #[error("failed to read kubeconfig {}: {source}", .path.display())]
    Read {
        /// The kubeconfig path that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: KubeconfigError,
    },

    /// The kubeconfig could not be resolved into a client configuration
    #[error("failed to load kubeconfig: {0}")]
    Load(#[source] KubeconfigError),

    /// The client could not be built from its configuration
    #[error("failed to build client: {0}")]
    Client(#[source] kube_client::Error),
}

// === impl ClientArgs ===

impl ClientArgs {
    const FALLBACK_KUBECONFIG: &'static str = "./config";

    /// Returns the kubeconfig path that will be loaded.
    ///
    /// An explicit path is used as given. Otherwise `$HOME/.kube/config` is
    /// used, or `./config` if no home directory can be determined.
    pub fn kubeconfig_path(&self) -> PathBuf {
        if let Some(path) = self.kubeconfig.as_ref() {
            return path.clone();
        }
        match home::home_dir() {
            Some(home) if !home.as_os_str().is_empty() => home.join(".kube").join("config"),
            _ => PathBuf::from(Self::FALLBACK_KUBECONFIG),
        }
    }

    /// Reads the kubeconfig and resolves the client configuration.
    pub async fn load_config(&self) -> Result<Config, ConfigError> {
        let path = self.kubeconfig_path();
        let kubeconfig = Kubeconfig::read_from(&path).map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "Failed to read kubeconfig");
            ConfigError::Read {
                path: path.clone(),
                source,
            }
        })?;

        let options = KubeConfigOptions {
            context: self.context.clone(),
            cluster: self.cluster.clone(),
            user: self.user.clone(),
        };
        let mut config = Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|error| {
                tracing::error!(path = %path.display(), %error, "Failed to load kubeconfig");
                ConfigError::Load(error)
            })?;

        if let Some(timeout) = self.request_timeout {
            config.read_timeout = Some(timeout.into());
        }
        tracing::debug!(path = %path.display(), cluster = %config.cluster_url, "Loaded kubeconfig");
        Ok(config)
    }

    /// Loads the kubeconfig and builds a client from it.
    pub async fn try_client(self) -> Result<Client, ConfigError> {
        let config = self.load_config().await?;
        Client::try_from(config).map_err(|error| {
            tracing::error!(%error, "Failed to build Kubernetes client");
            ConfigError::Client(error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters:
- name: dev
  cluster:
    server: https://dev.example.com:6443
    insecure-skip-tls-verify: true
- name: prod
  cluster:
    server: https://prod.example.com:6443
    insecure-skip-tls-verify: true
contexts:
- name: dev
  context:
    cluster: dev
    user: admin
    namespace: apps
- name: prod
  context:
    cluster: prod
    user: admin
users:
- name: admin
  user:
    token: not-a-real-token
"#;

    fn kubeconfig_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(KUBECONFIG.as_bytes()).expect("write kubeconfig");
        file
    }

    #[test]
    fn explicit_kubeconfig_path_wins() {
        let args = ClientArgs {
            kubeconfig: Some("/etc/k8s/admin.conf".into()),
            ..Default::default()
        };
        assert_eq!(args.kubeconfig_path(), PathBuf::from("/etc/k8s/admin.conf"));
    }

    #[test]
    fn default_kubeconfig_path() {
        let path = ClientArgs::default().kubeconfig_path();
        match home::home_dir() {
            Some(home) if !home.as_os_str().is_empty() => {
                assert_eq!(path, home.join(".kube").join("config"))
            }
            _ => assert_eq!(path, PathBuf::from("./config")),
        }
    }

    #[tokio::test]
    async fn loads_current_context() {
        let file = kubeconfig_file();
        let args = ClientArgs {
            kubeconfig: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = args.load_config().await.expect("config");
        assert_eq!(config.cluster_url.host(), Some("dev.example.com"));
        assert_eq!(config.default_namespace, "apps");
    }

    #[tokio::test]
    async fn context_override_and_timeout() {
        let file = kubeconfig_file();
        let args = ClientArgs {
            kubeconfig: Some(file.path().to_path_buf()),
            context: Some("prod".into()),
            request_timeout: Some("1m30s".parse().expect("valid")),
            ..Default::default()
        };
        let config = args.load_config().await.expect("config");
        assert_eq!(config.cluster_url.host(), Some("prod.example.com"));
        assert_eq!(
            config.read_timeout,
            Some(std::time::Duration::from_secs(90))
        );
    }

    #[tokio::test]
    async fn missing_kubeconfig() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nope");
        let args = ClientArgs {
            kubeconfig: Some(path.clone()),
            ..Default::default()
        };
        match args.load_config().await {
            Err(ConfigError::Read { path: p, .. }) => assert_eq!(p, path),
            res => panic!("unexpected result: {:?}", res.map(|c| c.cluster_url)),
        }
    }

    #[tokio::test]
    async fn unknown_context() {
        let file = kubeconfig_file();
        let args = ClientArgs {
            kubeconfig: Some(file.path().to_path_buf()),
            context: Some("staging".into()),
            ..Default::default()
        };
        assert!(matches!(
            args.load_config().await,
            Err(ConfigError::Load(_))
        ));
    }
}
