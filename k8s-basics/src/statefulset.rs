//! StatefulSet example

use crate::{
    client::Client,
    crud::Resources,
    pods,
    script::{created_at, Report, Script, ScriptOptions, Workload},
    Error,
};
use k8s_openapi::{
    api::apps::v1::{StatefulSet, StatefulSetSpec},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube_client::Api;
use kube_core::ResourceExt;
use std::collections::BTreeMap;

/// The label key used by the statefulset's selector.
pub const SELECTOR_KEY: &str = "sts-app";

/// Describes the StatefulSet built by [`example`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatefulSetParams {
    /// Names the StatefulSet, its selector label value and its container.
    pub name: String,

    /// The container image.
    pub image: String,

    /// Labels set on the StatefulSet itself.
    pub labels: BTreeMap<String, String>,

    /// Replicas when created.
    pub replicas: i32,

    /// Replicas set by the update step.
    pub scaled_replicas: i32,
}

impl Default for StatefulSetParams {
    fn default() -> Self {
        Self {
            name: "test".to_string(),
            image: "nginx".to_string(),
            labels: BTreeMap::new(),
            replicas: 1,
            scaled_replicas: 2,
        }
    }
}

impl Workload for StatefulSet {
    fn summary(&self) -> String {
        let replicas = self.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
        format!(
            "statefulset[{}], replicas: {}, createtime: {}",
            self.name_any(),
            replicas,
            created_at(self)
        )
    }
}

/// Builds the StatefulSet described by `params` in memory.
pub fn new_statefulset(namespace: &str, params: &StatefulSetParams) -> StatefulSet {
    let (selector, template) = pods::template(SELECTOR_KEY, &params.name, &params.image);
    StatefulSet {
        metadata: ObjectMeta {
            name: Some(params.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: pods::labels(&params.labels),
            ..Default::default()
        },
        spec: Some(StatefulSetSpec {
            replicas: Some(params.replicas),
            selector,
            template,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Returns a handle for StatefulSets in `namespace`.
pub fn resources(client: Client, namespace: &str) -> Resources<StatefulSet> {
    Resources::new(Api::namespaced(client, namespace), &())
}

/// Builds and creates the StatefulSet described by `params`.
pub async fn create(
    statefulsets: &Resources<StatefulSet>,
    namespace: &str,
    params: &StatefulSetParams,
) -> Result<StatefulSet, Error> {
    statefulsets
        .create(&new_statefulset(namespace, params))
        .await
}

/// Sets the replica count on `statefulset` and submits the update.
pub async fn update_replicas(
    statefulsets: &Resources<StatefulSet>,
    mut statefulset: StatefulSet,
    replicas: i32,
) -> Result<StatefulSet, Error> {
    scale(&mut statefulset, replicas);
    statefulsets.update(&statefulset).await
}

fn scale(statefulset: &mut StatefulSet, replicas: i32) {
    statefulset.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
}

/// Runs the example script for a StatefulSet, scaling it to
/// `params.scaled_replicas` in the update step.
pub async fn example(
    statefulsets: Resources<StatefulSet>,
    namespace: &str,
    params: &StatefulSetParams,
    options: ScriptOptions,
) -> Result<Report, Error> {
    let scaled = params.scaled_replicas;
    Script::new(statefulsets, options)
        .run(new_statefulset(namespace, params), |statefulset| {
            scale(statefulset, scaled);
            Ok(())
        })
        .await
}
