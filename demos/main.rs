#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

use anyhow::{bail, Result};
use clap::Parser;
use k8s_basics::{
    crontab::{self, CronTabParams},
    crud::{Resources, Verification},
    daemonset::{self, DaemonSetParams},
    deployment::{self, DeploymentParams},
    nodes,
    statefulset::{self, StatefulSetParams},
    Report, Runtime, ScriptOptions,
};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use tracing::Instrument;

#[derive(Clone, Parser)]
#[clap(version, about = "Create, update, list, get and delete Kubernetes workloads")]
struct Args {
    #[clap(flatten)]
    log: k8s_basics::LogArgs,

    #[clap(flatten)]
    client: k8s_basics::ClientArgs,

    #[clap(flatten)]
    examples: Examples,
}

/// Selects and parameterizes the examples to run
#[derive(Clone, Debug, clap::Args)]
struct Examples {
    /// List all nodes
    #[arg(long)]
    node_example: bool,

    /// Run the Deployment example
    #[arg(long)]
    deploy: bool,

    /// Run the DaemonSet example
    #[arg(long)]
    ds: bool,

    /// Run the StatefulSet example
    #[arg(long)]
    sts: bool,

    /// Run the CronTab custom resource example
    #[arg(long)]
    crd: bool,

    /// The namespace to create resources in
    #[arg(short, long, default_value = "default")]
    namespace: String,

    /// The name of each created resource
    #[arg(long, default_value = "test")]
    name: String,

    /// The container image used by the workload examples
    #[arg(long, default_value = "nginx")]
    image: String,

    /// The initial replica count for Deployments and StatefulSets
    #[arg(long, default_value = "1")]
    replicas: i32,

    /// Only list resources matching this label selector
    #[arg(long, short = 'l')]
    selector: Option<String>,

    /// How long the Deployment example waits between updating and listing
    #[arg(long, default_value = "5s")]
    settle: kube_core::Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        log,
        client,
        examples,
    } = Args::parse();

    let rt = Runtime::builder()
        .with_log(log.log_level.filter(), log.log_format)
        .with_client(client)
        .build()
        .await?;

    let failed = examples.run(&rt).await;
    if !failed.is_empty() {
        bail!("examples failed: {}", failed.join(", "));
    }
    Ok(())
}

// === impl Examples ===

impl Examples {
    /// Runs every selected example in order, returning the names of those
    /// that failed.
    async fn run(&self, rt: &Runtime) -> Vec<&'static str> {
        let Self {
            namespace, name, ..
        } = self;
        let options = ScriptOptions {
            selector: self.selector.clone(),
            ..Default::default()
        };
        let mut failed = Vec::new();

        if self.node_example {
            println!("list nodes");
            match nodes::list(rt.cluster())
                .instrument(tracing::info_span!("nodes"))
                .await
            {
                Ok(nodes) => nodes.iter().for_each(|node| println!("get {node}")),
                Err(error) => {
                    tracing::error!(%error, "Failed to list nodes");
                    failed.push("nodes");
                }
            }
        }

        if self.deploy {
            let params = DeploymentParams {
                name: name.clone(),
                image: self.image.clone(),
                replicas: self.replicas,
                ..Default::default()
            };
            let options = ScriptOptions {
                settle: self.settle.into(),
                ..options.clone()
            };
            let deployments = rt.namespaced::<Deployment>(namespace).into();
            let res = deployment::example(deployments, namespace, &params, options)
                .instrument(tracing::info_span!("deployment", %namespace, %name))
                .await;
            print_outcome("deployment", res, &mut failed);
        }

        if self.ds {
            let params = DaemonSetParams {
                name: name.clone(),
                image: self.image.clone(),
                ..Default::default()
            };
            let daemonsets = rt.namespaced::<DaemonSet>(namespace).into();
            let res = daemonset::example(daemonsets, namespace, &params, options.clone())
                .instrument(tracing::info_span!("daemonset", %namespace, %name))
                .await;
            print_outcome("daemonset", res, &mut failed);
        }

        if self.sts {
            let params = StatefulSetParams {
                name: name.clone(),
                image: self.image.clone(),
                replicas: self.replicas,
                ..Default::default()
            };
            let statefulsets = rt.namespaced::<StatefulSet>(namespace).into();
            let res = statefulset::example(statefulsets, namespace, &params, options.clone())
                .instrument(tracing::info_span!("statefulset", %namespace, %name))
                .await;
            print_outcome("statefulset", res, &mut failed);
        }

        if self.crd {
            let params = CronTabParams {
                name: name.clone(),
                ..Default::default()
            };
            let resource = crontab::api_resource();
            let crontabs = Resources::new(rt.dynamic(namespace, &resource), &resource);
            let res = crontab::example(crontabs, namespace, &params, options)
                .instrument(tracing::info_span!("crontab", %namespace, %name))
                .await;
            print_outcome("crontab", res, &mut failed);
        }

        failed
    }
}

fn print_outcome(
    example: &'static str,
    res: Result<Report, k8s_basics::Error>,
    failed: &mut Vec<&'static str>,
) {
    match res {
        Ok(report) => {
            println!("{} {}: created {}", report.kind, report.name, report.created);
            println!("{} {}: updated {}", report.kind, report.name, report.updated);
            for listed in &report.listed {
                println!("{listed}");
            }
            match report.verification {
                Verification::NotFound => println!("not found {} {}", report.kind, report.name),
                Verification::StillPresent(summary) => println!("still terminating {summary}"),
            }
        }
        Err(error) => {
            tracing::error!(%error, example, "Example failed");
            failed.push(example);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, Response, StatusCode};
    use k8s_basics::client::Client;
    use kube_client::client::Body;
    use std::time::Duration;

    const INTERNAL_ERROR: &str = r#"{
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": "etcd is unavailable",
        "reason": "InternalError",
        "code": 500
    }"#;

    #[test]
    fn defaults() {
        let Args { examples, .. } = Args::try_parse_from(["k8s-basics"]).expect("must parse");
        assert!(!examples.node_example && !examples.deploy && !examples.crd);
        assert!(!examples.ds && !examples.sts);
        assert_eq!(examples.namespace, "default");
        assert_eq!(examples.name, "test");
        assert_eq!(examples.image, "nginx");
        assert_eq!(examples.replicas, 1);
        assert_eq!(examples.selector, None);
        assert_eq!(Duration::from(examples.settle), Duration::from_secs(5));
    }

    #[test]
    fn selects_examples() {
        let Args {
            client, examples, ..
        } = Args::try_parse_from([
            "k8s-basics",
            "--deploy",
            "--crd",
            "-n",
            "apps",
            "-l",
            "app=test",
            "--settle",
            "1m30s",
            "--kubeconf",
            "/tmp/kubeconfig",
        ])
        .expect("must parse");
        assert!(examples.deploy && examples.crd);
        assert!(!examples.ds && !examples.sts);
        assert_eq!(examples.namespace, "apps");
        assert_eq!(examples.selector.as_deref(), Some("app=test"));
        assert_eq!(Duration::from(examples.settle), Duration::from_secs(90));
        assert_eq!(
            client.kubeconfig.as_deref(),
            Some(std::path::Path::new("/tmp/kubeconfig"))
        );
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(Args::try_parse_from(["k8s-basics", "--replicas", "many"]).is_err());
        assert!(Args::try_parse_from(["k8s-basics", "--settle", "soon"]).is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failures_do_not_stop_later_examples() {
        let (mock_service, mut handle) =
            tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let rt = Runtime::from_client(Client::new(mock_service, "default"));
        let server = tokio::spawn(async move {
            let mut calls = Vec::new();
            while let Some((request, send)) = handle.next_request().await {
                calls.push(format!("{} {}", request.method(), request.uri().path()));
                let rsp = Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header("content-type", "application/json")
                    .body(Body::from(INTERNAL_ERROR.as_bytes().to_vec()))
                    .expect("response");
                send.send_response(rsp);
            }
            calls
        });

        let Args { examples, .. } =
            Args::try_parse_from(["k8s-basics", "--node-example", "--deploy", "--crd"])
                .expect("must parse");
        let failed = examples.run(&rt).await;
        assert_eq!(failed, vec!["nodes", "deployment", "crontab"]);

        drop(rt);
        let calls = server.await.expect("server");
        assert_eq!(
            calls,
            vec![
                "GET /api/v1/nodes",
                "POST /apis/apps/v1/namespaces/default/deployments",
                "POST /apis/stable.example.com/v1/namespaces/default/crontabs",
            ]
        );
    }
}
