//! DaemonSet example

use crate::{
    client::Client,
    crud::Resources,
    pods,
    script::{created_at, Report, Script, ScriptOptions, Workload},
    Error,
};
use k8s_openapi::{
    api::apps::v1::{DaemonSet, DaemonSetSpec},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube_client::Api;
use kube_core::ResourceExt;
use std::collections::BTreeMap;

/// The label key used by the daemonset's selector.
pub const SELECTOR_KEY: &str = "ds-app";

/// Describes the DaemonSet built by [`example`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaemonSetParams {
    /// Names the DaemonSet, its selector label value and its container.
    pub name: String,

    /// The container image when created.
    pub image: String,

    /// Labels set on the DaemonSet itself.
    pub labels: BTreeMap<String, String>,

    /// The container image set by the update step.
    pub updated_image: String,
}

impl Default for DaemonSetParams {
    fn default() -> Self {
        Self {
            name: "test".to_string(),
            image: "nginx".to_string(),
            labels: BTreeMap::new(),
            updated_image: "tomcat".to_string(),
        }
    }
}

impl Workload for DaemonSet {
    fn summary(&self) -> String {
        format!(
            "daemonset[{}], createtime: {}",
            self.name_any(),
            created_at(self)
        )
    }
}

/// Builds the DaemonSet described by `params` in memory.
pub fn new_daemonset(namespace: &str, params: &DaemonSetParams) -> DaemonSet {
    let (selector, template) = pods::template(SELECTOR_KEY, &params.name, &params.image);
    DaemonSet {
        metadata: ObjectMeta {
            name: Some(params.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: pods::labels(&params.labels),
            ..Default::default()
        },
        spec: Some(DaemonSetSpec {
            selector,
            template,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Returns a handle for DaemonSets in `namespace`.
pub fn resources(client: Client, namespace: &str) -> Resources<DaemonSet> {
    Resources::new(Api::namespaced(client, namespace), &())
}

/// Builds and creates the DaemonSet described by `params`.
pub async fn create(
    daemonsets: &Resources<DaemonSet>,
    namespace: &str,
    params: &DaemonSetParams,
) -> Result<DaemonSet, Error> {
    daemonsets.create(&new_daemonset(namespace, params)).await
}

/// Sets the image of every container on `daemonset` and submits the update.
pub async fn update_image(
    daemonsets: &Resources<DaemonSet>,
    mut daemonset: DaemonSet,
    image: &str,
) -> Result<DaemonSet, Error> {
    set_image(&mut daemonset, image);
    daemonsets.update(&daemonset).await
}

fn set_image(daemonset: &mut DaemonSet, image: &str) {
    if let Some(spec) = daemonset.spec.as_mut() {
        pods::set_image(&mut spec.template, image);
    }
}

/// Runs the example script for a DaemonSet, switching every container to
/// `params.updated_image` in the update step.
pub async fn example(
    daemonsets: Resources<DaemonSet>,
    namespace: &str,
    params: &DaemonSetParams,
    options: ScriptOptions,
) -> Result<Report, Error> {
    let image = params.updated_image.clone();
    Script::new(daemonsets, options)
        .run(new_daemonset(namespace, params), move |daemonset| {
            set_image(daemonset, &image);
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_daemonset() {
        let daemonset = new_daemonset("kube-system", &DaemonSetParams::default());
        assert_eq!(daemonset.metadata.name.as_deref(), Some("test"));
        assert_eq!(daemonset.metadata.namespace.as_deref(), Some("kube-system"));
        assert_eq!(daemonset.metadata.labels, None);

        let spec = daemonset.spec.as_ref().expect("spec");
        assert_eq!(
            spec.selector
                .match_labels
                .as_ref()
                .and_then(|l| l.get(SELECTOR_KEY)),
            Some(&"test".to_string())
        );
        assert_eq!(pods::images(&spec.template), vec!["nginx"]);
    }

    #[test]
    fn update_sets_image() {
        let mut daemonset = new_daemonset("default", &DaemonSetParams::default());
        set_image(&mut daemonset, "tomcat");
        let spec = daemonset.spec.as_ref().expect("spec");
        assert_eq!(pods::images(&spec.template), vec!["tomcat"]);
    }

    #[test]
    fn summary_without_timestamp() {
        let daemonset = new_daemonset("default", &DaemonSetParams::default());
        assert_eq!(daemonset.summary(), "daemonset[test], createtime: <none>");
    }
}
