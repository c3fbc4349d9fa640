//! Create, update, list, get and delete Kubernetes workloads with [`kube`]
//!
//! Each workload module builds an object in memory and drives it through the
//! same script: create it, update it, list the kind, fetch it by name, delete
//! it, and confirm the deletion by fetching it again and expecting a
//! not-found response.
//!
//! # Crate Features
//!
//! All feature flags are disabled by default. The following feature flags are
//! available:
//!
//! ### Module Features
//!
//! - **client**: Enables the [`client`] and [`errors`] modules.
//! - **log**: Enables the [`log`] module.
//! - **runtime**: Enables the [`runtime`] module. Enabling this feature flag
//!   also enables the **client** and **log** features.
//! - **workloads**: Enables the [`crud`], [`script`], [`deployment`],
//!   [`daemonset`], [`statefulset`], [`crontab`], and [`nodes`] modules.
//!   Enabling this feature flag also enables the **client** feature.
//!
//! ### Optional Dependencies
//!
//! - **clap**: Enables support for command-line argument parsing using
//!   [`clap`]. When this feature is enabled, [`ClientArgs`] and [`LogArgs`]
//!   can be flattened into a [`clap::Parser`].
//!
//! ### TLS Features
//!
//! These feature flags select the TLS implementation used by the
//! [`kube-client`] crate.
//!
//! - **rustls-tls**: Use [`rustls`] as the TLS implementation. The
//!   **rustls-tls-ring** and **rustls-tls-aws-lc-rs** variants also select the
//!   crypto provider.
//! - **openssl-tls**: Use OpenSSL as the TLS implementation.
//!
//! [`kube`]: https://github.com/kube-rs/kube-rs
//! [`clap`]: https://crates.io/crates/clap
//! [`clap::Parser`]: https://docs.rs/clap/4/clap/trait.Parser.html
//! [`kube-client`]: https://crates.io/crates/kube-client
//! [`rustls`]: https://crates.io/crates/rustls

#![deny(rust_2018_idioms)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod client;

#[cfg(feature = "workloads")]
#[cfg_attr(docsrs, doc(cfg(feature = "workloads")))]
pub mod crontab;

#[cfg(feature = "workloads")]
#[cfg_attr(docsrs, doc(cfg(feature = "workloads")))]
pub mod crud;

#[cfg(feature = "workloads")]
#[cfg_attr(docsrs, doc(cfg(feature = "workloads")))]
pub mod daemonset;

#[cfg(feature = "workloads")]
#[cfg_attr(docsrs, doc(cfg(feature = "workloads")))]
pub mod deployment;

#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod errors;

#[cfg(feature = "log")]
#[cfg_attr(docsrs, doc(cfg(feature = "log")))]
pub mod log;

#[cfg(feature = "workloads")]
#[cfg_attr(docsrs, doc(cfg(feature = "workloads")))]
pub mod nodes;

#[cfg(feature = "workloads")]
mod pods;

#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub mod runtime;

#[cfg(feature = "workloads")]
#[cfg_attr(docsrs, doc(cfg(feature = "workloads")))]
pub mod script;

#[cfg(feature = "workloads")]
#[cfg_attr(docsrs, doc(cfg(feature = "workloads")))]
pub mod statefulset;

#[cfg(feature = "client")]
pub use self::client::{ClientArgs, RequestTimeout};

#[cfg(feature = "client")]
pub use self::errors::Error;

#[cfg(feature = "log")]
pub use self::log::{LogArgs, LogFilter, LogFormat, LogInitError, LogLevel};

#[cfg(feature = "runtime")]
pub use self::runtime::Runtime;

#[cfg(feature = "workloads")]
pub use self::script::{Report, Script, ScriptOptions, Workload};
