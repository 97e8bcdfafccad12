// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running auxiliary services composed into a context's Docker
//! Compose project (spec.md §4.3 `withServices`): DNS, git-livereload,
//! localstack, per-registry, and per-cluster-node services.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to render service definition for {0}: {1}")]
    Render(String, String),
}

#[async_trait]
pub trait Service: Send + Sync {
    fn init(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// The compose service name this contributes, e.g. `dns`,
    /// `git-livereload`, `localstack`, `registry.<name>`,
    /// `cluster-node.<name>`.
    fn name(&self) -> String;

    /// Render this service's compose fragment (image, ports, volumes) as
    /// a YAML document body, to be merged into the generated compose file.
    fn compose_fragment(&self) -> Result<String, ServiceError>;
}

macro_rules! static_service {
    ($ident:ident, $name:literal, $image:literal) => {
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $ident;

        #[async_trait]
        impl Service for $ident {
            fn name(&self) -> String {
                $name.to_string()
            }

            fn compose_fragment(&self) -> Result<String, ServiceError> {
                Ok(format!("image: {}\n", $image))
            }
        }
    };
}

static_service!(DnsService, "dns", "coredns/coredns:latest");
static_service!(
    GitLivereloadService,
    "git-livereload",
    "nginx:alpine"
);
static_service!(
    LocalstackService,
    "localstack",
    "localstack/localstack:latest"
);

/// One entry under `docker.registries`.
pub struct RegistryService {
    name: String,
    remote: Option<String>,
}

impl RegistryService {
    pub fn new(name: impl Into<String>, remote: Option<String>) -> Self {
        Self {
            name: name.into(),
            remote,
        }
    }
}

#[async_trait]
impl Service for RegistryService {
    fn name(&self) -> String {
        format!("registry.{}", self.name)
    }

    fn compose_fragment(&self) -> Result<String, ServiceError> {
        match &self.remote {
            Some(remote) => Ok(format!(
                "image: registry:2\nenvironment:\n  REGISTRY_PROXY_REMOTEURL: {}\n",
                remote
            )),
            None => Ok("image: registry:2\n".to_string()),
        }
    }
}

/// One control-plane or worker node for a Talos/Omni cluster.
pub struct ClusterNodeService {
    name: String,
    role: &'static str,
}

impl ClusterNodeService {
    pub fn control_plane(index: u32) -> Self {
        Self {
            name: format!("controlplane-{index}"),
            role: "controlplane",
        }
    }

    pub fn worker(index: u32) -> Self {
        Self {
            name: format!("worker-{index}"),
            role: "worker",
        }
    }
}

#[async_trait]
impl Service for ClusterNodeService {
    fn name(&self) -> String {
        format!("cluster-node.{}", self.name)
    }

    fn compose_fragment(&self) -> Result<String, ServiceError> {
        Ok(format!(
            "image: ghcr.io/siderolabs/talos:latest\nlabels:\n  role: {}\n",
            self.role
        ))
    }
}

/// Used where a pipeline needs a `Service` placeholder that contributes
/// nothing, e.g. a disabled feature flag still resolved through the DI
/// registry by key.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpService;

#[async_trait]
impl Service for NoOpService {
    fn name(&self) -> String {
        "noop".to_string()
    }

    fn compose_fragment(&self) -> Result<String, ServiceError> {
        Ok(String::new())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
