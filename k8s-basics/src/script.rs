//! The create, update, list, get, delete and verify sequence shared by every example

use crate::{
    crud::{Deletion, Resources, Verification},
    Error,
};
use kube_core::{Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt::Debug, time::Duration};
use tokio::time;

/// A resource kind that can be driven through a [`Script`]
pub trait Workload: Resource + Clone + Debug + DeserializeOwned + Serialize {
    /// A one-line description of the object, printed when listing.
    fn summary(&self) -> String;
}

/// Options that apply to a [`Script`] run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Restricts the list step to objects matching this label selector.
    pub selector: Option<String>,

    /// How long to wait after the update before listing.
    pub settle: Duration,
}

/// Runs the example sequence for one object
#[derive(Debug)]
pub struct Script<K> {
    resources: Resources<K>,
    options: ScriptOptions,
}

/// Summarizes each step of a completed [`Script`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// The resource kind.
    pub kind: String,

    /// The object name.
    pub name: String,

    /// The object as returned by the create call.
    pub created: String,

    /// The object as returned by the update call.
    pub updated: String,

    /// Every object returned by the list call.
    pub listed: Vec<String>,

    /// The object as returned by the get call.
    pub fetched: String,

    /// True if the server had removed the object when the delete call returned.
    pub deleted_immediately: bool,

    /// The outcome of fetching the object after deletion, carrying the
    /// summary of an object that is still present.
    pub verification: Verification<String>,
}

/// Formats an object's creation timestamp, or `<none>` if unset.
pub fn created_at<K: Resource>(object: &K) -> String {
    object
        .meta()
        .creation_timestamp
        .as_ref()
        .map(|t| t.0.to_string())
        .unwrap_or_else(|| "<none>".to_string())
}

// === impl Script ===

impl<K: Workload> Script<K> {
    /// Creates a script that issues its calls through `resources`.
    pub fn new(resources: Resources<K>, options: ScriptOptions) -> Self {
        Self { resources, options }
    }

    /// Creates `object`, applies `update` to the created object and submits
    /// it, lists the kind, fetches the object, deletes it, and checks that it
    /// is gone.
    ///
    /// The first failing call ends the run. An object that is still present
    /// after deletion is logged and reported rather than treated as an error.
    pub async fn run<F>(&self, object: K, update: F) -> Result<Report, Error>
    where
        F: FnOnce(&mut K) -> Result<(), Error>,
    {
        let kind = self.resources.kind().to_string();

        let mut created = self.resources.create(&object).await?;
        let name = created.name_any();
        tracing::info!(%kind, %name, createtime = %created_at(&created), "Created");
        let created_summary = created.summary();

        update(&mut created)?;
        let updated = self.resources.update(&created).await?;
        tracing::info!(%kind, %name, summary = %updated.summary(), "Updated");

        if !self.options.settle.is_zero() {
            tracing::debug!(settle = ?self.options.settle, "Waiting before listing");
            time::sleep(self.options.settle).await;
        }

        let listed = self
            .resources
            .list(self.options.selector.as_deref())
            .await?
            .iter()
            .map(Workload::summary)
            .collect::<Vec<_>>();
        tracing::info!(%kind, count = listed.len(), "Listed");

        let fetched = self.resources.get(&name).await?;
        tracing::info!(%kind, %name, createtime = %created_at(&fetched), "Fetched");

        let deleted_immediately = match self.resources.delete(&name).await? {
            Deletion::Done => true,
            Deletion::Pending(_) => false,
        };
        tracing::info!(%kind, %name, "Deleted");

        let verification = self.resources.verify_deleted(&name).await?;
        match &verification {
            Verification::NotFound => tracing::info!(%kind, %name, "Deletion verified"),
            Verification::StillPresent(object) => {
                let terminating = object.meta().deletion_timestamp.is_some();
                tracing::warn!(%kind, %name, terminating, "Still present after deletion");
            }
        }

        Ok(Report {
            kind,
            name,
            created: created_summary,
            updated: updated.summary(),
            listed,
            fetched: fetched.summary(),
            deleted_immediately,
            verification: verification.map(|object| object.summary()),
        })
    }
}
