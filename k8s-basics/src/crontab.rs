//! CronTab custom resource example, driven through the dynamic API
//!
//! The `crontabs.stable.example.com` CustomResourceDefinition must already be
//! installed in the cluster:
//!
//! ```yaml
//! apiVersion: "stable.example.com/v1"
//! kind: CronTab
//! metadata:
//!   name: my-new-cron-object
//! spec:
//!   cronSpec: "* * * * */5"
//!   image: my-awesome-cron-image
//! ```

use crate::{
    client::Client,
    crud::Resources,
    script::{created_at, Report, Script, ScriptOptions, Workload},
    Error,
};
use kube_client::Api;
use kube_core::{ApiResource, DynamicObject, GroupVersionKind, ResourceExt};
use serde_json::{json, Value};

/// The CronTab API group.
pub const GROUP: &str = "stable.example.com";

/// The CronTab API version.
pub const VERSION: &str = "v1";

/// The CronTab kind.
pub const KIND: &str = "CronTab";

/// The CronTab resource name used in API paths.
pub const PLURAL: &str = "crontabs";

/// Describes the CronTab built by [`example`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CronTabParams {
    /// The CronTab name.
    pub name: String,

    /// The `spec.cronSpec` schedule.
    pub cron_spec: String,

    /// The `spec.image` when created.
    pub image: String,

    /// The `spec.image` set by the update step.
    pub updated_image: String,
}

impl Default for CronTabParams {
    fn default() -> Self {
        Self {
            name: "test".to_string(),
            cron_spec: "* * * * */5".to_string(),
            image: "my-crontab-image:v1".to_string(),
            updated_image: "new-image-abc:v2".to_string(),
        }
    }
}

impl Workload for DynamicObject {
    fn summary(&self) -> String {
        format!(
            "cr[{}], createtime: {}, image: {}",
            self.name_any(),
            created_at(self),
            image(self).unwrap_or("<none>")
        )
    }
}

/// Describes the CronTab resource to the dynamic API.
pub fn api_resource() -> ApiResource {
    ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(GROUP, VERSION, KIND), PLURAL)
}

/// Builds the CronTab described by `params` in memory.
pub fn new_crontab(namespace: &str, params: &CronTabParams) -> DynamicObject {
    DynamicObject::new(&params.name, &api_resource())
        .within(namespace)
        .data(json!({
            "spec": {
                "cronSpec": params.cron_spec,
                "image": params.image,
            }
        }))
}

/// Reads `spec.image`, if it is set to a string.
pub fn image(crontab: &DynamicObject) -> Option<&str> {
    crontab.data.get("spec")?.get("image")?.as_str()
}

/// Sets `spec.image`, creating `spec` if it is absent.
pub fn set_image(crontab: &mut DynamicObject, image: &str) -> Result<(), Error> {
    if crontab.data.is_null() {
        crontab.data = json!({});
    }
    let root = crontab
        .data
        .as_object_mut()
        .ok_or_else(|| Error::Unstructured {
            path: "spec.image".to_string(),
            reason: "object data is not a map",
        })?;
    let spec = root.entry("spec").or_insert_with(|| json!({}));
    if spec.is_null() {
        *spec = json!({});
    }
    let spec = spec.as_object_mut().ok_or_else(|| Error::Unstructured {
        path: "spec.image".to_string(),
        reason: "spec is not a map",
    })?;
    spec.insert("image".to_string(), Value::from(image));
    Ok(())
}

/// Returns a handle for CronTabs in `namespace`.
pub fn resources(client: Client, namespace: &str) -> Resources<DynamicObject> {
    let resource = api_resource();
    Resources::new(Api::namespaced_with(client, namespace, &resource), &resource)
}

/// Builds and creates the CronTab described by `params`.
pub async fn create(
    crontabs: &Resources<DynamicObject>,
    namespace: &str,
    params: &CronTabParams,
) -> Result<DynamicObject, Error> {
    crontabs.create(&new_crontab(namespace, params)).await
}

/// Sets `spec.image` on `crontab` and submits the update.
pub async fn update_image(
    crontabs: &Resources<DynamicObject>,
    mut crontab: DynamicObject,
    image: &str,
) -> Result<DynamicObject, Error> {
    set_image(&mut crontab, image)?;
    crontabs.update(&crontab).await
}

/// Runs the example script for a CronTab, switching `spec.image` to
/// `params.updated_image` in the update step.
pub async fn example(
    crontabs: Resources<DynamicObject>,
    namespace: &str,
    params: &CronTabParams,
    options: ScriptOptions,
) -> Result<Report, Error> {
    let image = params.updated_image.clone();
    Script::new(crontabs, options)
        .run(new_crontab(namespace, params), move |crontab| {
            set_image(crontab, &image)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_crontab() {
        let crontab = new_crontab("default", &CronTabParams::default());
        let value = serde_json::to_value(&crontab).expect("serialize");
        assert_eq!(
            value,
            json!({
                "apiVersion": "stable.example.com/v1",
                "kind": "CronTab",
                "metadata": {
                    "name": "test",
                    "namespace": "default",
                },
                "spec": {
                    "cronSpec": "* * * * */5",
                    "image": "my-crontab-image:v1",
                },
            })
        );
    }

    #[test]
    fn api_resource_paths() {
        let resource = api_resource();
        assert_eq!(resource.api_version, "stable.example.com/v1");
        assert_eq!(resource.plural, "crontabs");
        assert_eq!(resource.kind, "CronTab");
    }

    #[test]
    fn sets_image() {
        let mut crontab = new_crontab("default", &CronTabParams::default());
        assert_eq!(image(&crontab), Some("my-crontab-image:v1"));
        set_image(&mut crontab, "new-image-abc:v2").expect("set image");
        assert_eq!(image(&crontab), Some("new-image-abc:v2"));
        assert_eq!(crontab.data["spec"]["cronSpec"], "* * * * */5");
    }

    #[test]
    fn set_image_creates_spec() {
        let mut crontab = DynamicObject::new("bare", &api_resource());
        assert_eq!(image(&crontab), None);
        set_image(&mut crontab, "busybox").expect("set image");
        assert_eq!(image(&crontab), Some("busybox"));
    }

    #[test]
    fn set_image_rejects_scalar_spec() {
        let mut crontab =
            DynamicObject::new("odd", &api_resource()).data(json!({ "spec": "not-a-map" }));
        assert!(matches!(
            set_image(&mut crontab, "busybox"),
            Err(Error::Unstructured { .. })
        ));
    }

    #[test]
    fn summary() {
        let crontab = new_crontab("default", &CronTabParams::default());
        assert_eq!(
            crontab.summary(),
            "cr[test], createtime: <none>, image: my-crontab-image:v1"
        );
    }
}
