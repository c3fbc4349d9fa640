//! Lists cluster nodes

use crate::{crud::Resources, Error};
use k8s_openapi::api::core::v1::Node;
use kube_client::Api;
use kube_core::ResourceExt;

/// A node's name and CPU architecture
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSummary {
    /// The node name.
    pub name: String,

    /// The architecture reported by the kubelet, or empty if unreported.
    pub architecture: String,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        let architecture = node
            .status
            .as_ref()
            .and_then(|s| s.node_info.as_ref())
            .map(|info| info.architecture.clone())
            .unwrap_or_default();
        Self {
            name: node.name_any(),
            architecture,
        }
    }
}

impl std::fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node[{}], arch[{}]", self.name, self.architecture)
    }
}

/// Lists every node in the cluster.
pub async fn list(nodes: Api<Node>) -> Result<Vec<NodeSummary>, Error> {
    let nodes = Resources::<Node>::from(nodes).list(None).await?;
    tracing::debug!(count = nodes.len(), "Listed nodes");
    Ok(nodes.iter().map(NodeSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_node() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "apiVersion": "v1",
            "kind": "Node",
            "metadata": { "name": "worker-0" },
            "status": {
                "nodeInfo": {
                    "architecture": "arm64",
                    "bootID": "",
                    "containerRuntimeVersion": "",
                    "kernelVersion": "",
                    "kubeProxyVersion": "",
                    "kubeletVersion": "",
                    "machineID": "",
                    "operatingSystem": "linux",
                    "osImage": "",
                    "systemUUID": "",
                }
            }
        }))
        .expect("node");
        let summary = NodeSummary::from(&node);
        assert_eq!(summary.to_string(), "node[worker-0], arch[arm64]");
    }

    #[test]
    fn missing_status() {
        let node = Node {
            metadata: k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta {
                name: Some("pending".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(NodeSummary::from(&node).to_string(), "node[pending], arch[]");
    }
}
