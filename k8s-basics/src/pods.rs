use k8s_openapi::{
    api::core::v1::{Container, PodSpec, PodTemplateSpec},
    apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta},
};
use std::collections::BTreeMap;

/// Builds a selector matching `key=name` and a pod template carrying the same
/// label, running a single container named `name`.
pub(crate) fn template(key: &str, name: &str, image: &str) -> (LabelSelector, PodTemplateSpec) {
    let labels = BTreeMap::from([(key.to_string(), name.to_string())]);
    let selector = LabelSelector {
        match_labels: Some(labels.clone()),
        ..Default::default()
    };
    let template = PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels),
            ..Default::default()
        }),
        spec: Some(PodSpec {
            containers: vec![Container {
                name: name.to_string(),
                image: Some(image.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }),
    };
    (selector, template)
}

/// Wraps optional object labels, leaving them unset when empty.
pub(crate) fn labels(labels: &BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    (!labels.is_empty()).then(|| labels.clone())
}

/// Sets the image of every container in the template.
pub(crate) fn set_image(template: &mut PodTemplateSpec, image: &str) {
    for container in template
        .spec
        .iter_mut()
        .flat_map(|spec| spec.containers.iter_mut())
    {
        container.image = Some(image.to_string());
    }
}

/// Lists the container images in the template.
#[cfg(test)]
pub(crate) fn images(template: &PodTemplateSpec) -> Vec<&str> {
    template
        .spec
        .iter()
        .flat_map(|spec| spec.containers.iter())
        .filter_map(|c| c.image.as_deref())
        .collect()
}
