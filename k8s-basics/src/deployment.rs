//! Deployment example

use crate::{
    client::Client,
    crud::Resources,
    pods,
    script::{Report, Script, ScriptOptions, Workload},
    Error,
};
use k8s_openapi::{
    api::apps::v1::{Deployment, DeploymentSpec},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube_client::Api;
use kube_core::ResourceExt;
use std::collections::BTreeMap;

/// The label key used by the deployment's selector.
pub const SELECTOR_KEY: &str = "app";

/// Describes the Deployment built by [`example`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentParams {
    /// Names the Deployment, its selector label value and its container.
    pub name: String,

    /// The container image.
    pub image: String,

    /// Labels set on the Deployment itself.
    pub labels: BTreeMap<String, String>,

    /// Replicas when created.
    pub replicas: i32,

    /// Replicas set by the update step.
    pub scaled_replicas: i32,
}

impl Default for DeploymentParams {
    fn default() -> Self {
        Self {
            name: "test".to_string(),
            image: "nginx".to_string(),
            labels: BTreeMap::new(),
            replicas: 1,
            scaled_replicas: 0,
        }
    }
}

impl Workload for Deployment {
    fn summary(&self) -> String {
        let replicas = self.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
        format!("deployment[{}], replicas: {}", self.name_any(), replicas)
    }
}

/// Builds the Deployment described by `params` in memory.
pub fn new_deployment(namespace: &str, params: &DeploymentParams) -> Deployment {
    let (selector, template) = pods::template(SELECTOR_KEY, &params.name, &params.image);
    Deployment {
        metadata: ObjectMeta {
            name: Some(params.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: pods::labels(&params.labels),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(params.replicas),
            selector,
            template,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Returns a handle for Deployments in `namespace`.
pub fn resources(client: Client, namespace: &str) -> Resources<Deployment> {
    Resources::new(Api::namespaced(client, namespace), &())
}

/// Builds and creates the Deployment described by `params`.
pub async fn create(
    deployments: &Resources<Deployment>,
    namespace: &str,
    params: &DeploymentParams,
) -> Result<Deployment, Error> {
    deployments
        .create(&new_deployment(namespace, params))
        .await
}

/// Sets the replica count on `deployment` and submits the update.
pub async fn update_replicas(
    deployments: &Resources<Deployment>,
    mut deployment: Deployment,
    replicas: i32,
) -> Result<Deployment, Error> {
    scale(&mut deployment, replicas);
    deployments.update(&deployment).await
}

fn scale(deployment: &mut Deployment, replicas: i32) {
    deployment.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
}

/// Runs the example script for a Deployment, scaling it to
/// `params.scaled_replicas` in the update step.
pub async fn example(
    deployments: Resources<Deployment>,
    namespace: &str,
    params: &DeploymentParams,
    options: ScriptOptions,
) -> Result<Report, Error> {
    let scaled = params.scaled_replicas;
    Script::new(deployments, options)
        .run(new_deployment(namespace, params), |deployment| {
            scale(deployment, scaled);
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_deployment() {
        let params = DeploymentParams {
            labels: BTreeMap::from([("team".to_string(), "web".to_string())]),
            replicas: 3,
            ..Default::default()
        };
        let deployment = new_deployment("apps", &params);
        assert_eq!(deployment.metadata.name.as_deref(), Some("test"));
        assert_eq!(deployment.metadata.namespace.as_deref(), Some("apps"));
        assert_eq!(
            deployment.metadata.labels.as_ref().and_then(|l| l.get("team")),
            Some(&"web".to_string())
        );

        let spec = deployment.spec.as_ref().expect("spec");
        assert_eq!(spec.replicas, Some(3));
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
    fn summary_and_scale() {
        let mut deployment = new_deployment("default", &DeploymentParams::default());
        assert_eq!(deployment.summary(), "deployment[test], replicas: 1");
        scale(&mut deployment, 0);
        assert_eq!(deployment.summary(), "deployment[test], replicas: 0");
    }

    #[test]
    fn serializes_for_the_apps_api() {
        let value = serde_json::to_value(new_deployment("default", &Default::default()))
            .expect("serialize");
        assert_eq!(value["apiVersion"], "apps/v1");
        assert_eq!(value["kind"], "Deployment");
        assert_eq!(
            value["spec"]["template"]["metadata"]["labels"]["app"],
            "test"
        );
        assert!(value["metadata"].get("labels").is_none());
    }
}
