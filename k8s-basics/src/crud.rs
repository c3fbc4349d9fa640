//! Create, update, list, get and delete calls for any resource kind
//!
//! [`Resources`] pairs an [`Api`] with the kind name it serves so that every
//! call is traced and every failure is reported with the verb, kind and
//! object name that failed.

use crate::errors::{self, Error, Verb};
use kube_client::{
    api::{DeleteParams, ListParams, PostParams},
    Api,
};
use kube_core::Resource;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Issues API calls for one resource kind in one scope.
pub struct Resources<K> {
    api: Api<K>,
    kind: String,
}

/// The server's answer to a delete call
#[derive(Clone, Debug)]
pub enum Deletion<K> {
    /// The server removed the object.
    Done,

    /// The server accepted the deletion but the object still exists, e.g.
    /// while finalizers or graceful termination run.
    Pending(K),
}

/// The result of fetching an object after it was deleted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification<K> {
    /// The server reports the object as not found.
    NotFound,

    /// The object can still be fetched.
    StillPresent(K),
}

// === impl Resources ===

impl<K> Resources<K>
where
    K: Resource + Clone + DeserializeOwned + Serialize + Debug,
{
    /// Wraps `api`, naming the kind from its dynamic type.
    pub fn new(api: Api<K>, dyntype: &K::DynamicType) -> Self {
        Self {
            api,
            kind: K::kind(dyntype).into_owned(),
        }
    }

    /// The kind served by this handle.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Creates `object`, returning the object as stored by the server.
    pub async fn create(&self, object: &K) -> Result<K, Error> {
        let name = object.meta().name.clone().unwrap_or_default();
        tracing::debug!(kind = %self.kind, %name, "Creating");
        self.api
            .create(&PostParams::default(), object)
            .await
            .map_err(|error| Error::api(Verb::Create, &self.kind, name, error))
    }

    /// Replaces the stored object with `object`.
    ///
    /// The object's resource version is sent along, so the update fails with
    /// a conflict if the object changed since it was read.
    pub async fn update(&self, object: &K) -> Result<K, Error> {
        let name = object
            .meta()
            .name
            .clone()
            .ok_or_else(|| Error::MissingField {
                kind: self.kind.clone(),
                field: "metadata.name",
            })?;
        tracing::debug!(kind = %self.kind, %name, "Updating");
        self.api
            .replace(&name, &PostParams::default(), object)
            .await
            .map_err(|error| Error::api(Verb::Update, &self.kind, name, error))
    }

    /// Lists objects, optionally restricted to those matching a label selector.
    pub async fn list(&self, selector: Option<&str>) -> Result<Vec<K>, Error> {
        let params = selector
            .iter()
            .fold(ListParams::default(), |lp, selector| lp.labels(selector));
        tracing::debug!(kind = %self.kind, ?selector, "Listing");
        let list = self
            .api
            .list(&params)
            .await
            .map_err(|error| Error::api(Verb::List, &self.kind, "*", error))?;
        Ok(list.items)
    }

    /// Fetches the named object.
    pub async fn get(&self, name: &str) -> Result<K, Error> {
        tracing::debug!(kind = %self.kind, %name, "Getting");
        self.api
            .get(name)
            .await
            .map_err(|error| Error::api(Verb::Get, &self.kind, name, error))
    }

    /// Deletes the named object, letting the server collect its dependents
    /// in the background.
    pub async fn delete(&self, name: &str) -> Result<Deletion<K>, Error> {
        tracing::debug!(kind = %self.kind, %name, "Deleting");
        let rsp = self
            .api
            .delete(name, &DeleteParams::background())
            .await
            .map_err(|error| Error::api(Verb::Delete, &self.kind, name, error))?;
        Ok(rsp.either(Deletion::Pending, |_status| Deletion::Done))
    }

    /// Fetches the named object again, expecting it to be gone.
    pub async fn verify_deleted(&self, name: &str) -> Result<Verification<K>, Error> {
        match self.api.get(name).await {
            Ok(object) => Ok(Verification::StillPresent(object)),
            Err(error) if errors::is_not_found(&error) => {
                tracing::debug!(kind = %self.kind, %name, "Not found");
                Ok(Verification::NotFound)
            }
            Err(error) => Err(Error::api(Verb::Get, &self.kind, name, error)),
        }
    }
}

impl<K> From<Api<K>> for Resources<K>
where
    K: Resource + Clone + DeserializeOwned + Serialize + Debug,
    K::DynamicType: Default,
{
    fn from(api: Api<K>) -> Self {
        Self::new(api, &Default::default())
    }
}

// === impl Verification ===

impl<K> Verification<K> {
    /// Maps the still-present object, e.g. to a printable summary.
    pub fn map<T>(self, f: impl FnOnce(K) -> T) -> Verification<T> {
        match self {
            Self::NotFound => Verification::NotFound,
            Self::StillPresent(object) => Verification::StillPresent(f(object)),
        }
    }
}

impl<K: Clone> Clone for Resources<K> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<K> Debug for Resources<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
