// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes and cluster-node collaborators (spec.md §4.9 CheckPipeline
//! node-health, §4.3 `withClusterClient`/`withKubernetesClient`/
//! `withKubernetesManager`).

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KubeError {
    #[error("cluster node health check failed: {0}")]
    NodesUnhealthy(String),
    #[error("kubernetes health check failed: {0}")]
    KubernetesUnhealthy(String),
    #[error("kubernetes operation failed: {0}")]
    Operation(String),
}

/// Waits for the raw cluster-node layer (Talos/Omni nodes, before a
/// Kubernetes API is necessarily up).
#[async_trait]
pub trait ClusterClient: Send + Sync {
    fn init(&self) -> Result<(), KubeError> {
        Ok(())
    }

    async fn wait_for_nodes_healthy(
        &self,
        nodes: &[String],
        version: Option<&str>,
        timeout: Duration,
    ) -> Result<(), KubeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpClusterClient;

#[async_trait]
impl ClusterClient for NoOpClusterClient {
    async fn wait_for_nodes_healthy(
        &self,
        _nodes: &[String],
        _version: Option<&str>,
        _timeout: Duration,
    ) -> Result<(), KubeError> {
        Ok(())
    }
}

/// Thin client over the Kubernetes API for the checks pipelines need.
#[async_trait]
pub trait KubernetesClient: Send + Sync {
    fn init(&self) -> Result<(), KubeError> {
        Ok(())
    }

    async fn wait_for_kubernetes_healthy(&self, endpoint: &str) -> Result<(), KubeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpKubernetesClient;

#[async_trait]
impl KubernetesClient for NoOpKubernetesClient {
    async fn wait_for_kubernetes_healthy(&self, _endpoint: &str) -> Result<(), KubeError> {
        Ok(())
    }
}

/// Higher-level Kubernetes operations (applying manifests, installing
/// controllers) used by `InstallPipeline`.
#[async_trait]
pub trait KubernetesManager: Send + Sync {
    fn init(&self) -> Result<(), KubeError> {
        Ok(())
    }

    async fn install(&self) -> Result<(), KubeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpKubernetesManager;

#[async_trait]
impl KubernetesManager for NoOpKubernetesManager {
    async fn install(&self) -> Result<(), KubeError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct ClusterState {
        calls: Vec<(Vec<String>, Option<String>)>,
        err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeClusterClient {
        inner: Arc<Mutex<ClusterState>>,
    }

    impl FakeClusterClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail(&self, message: impl Into<String>) {
            self.inner.lock().err = Some(message.into());
        }

        pub fn calls(&self) -> Vec<(Vec<String>, Option<String>)> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl ClusterClient for FakeClusterClient {
        async fn wait_for_nodes_healthy(
            &self,
            nodes: &[String],
            version: Option<&str>,
            _timeout: Duration,
        ) -> Result<(), KubeError> {
            let mut state = self.inner.lock();
            state
                .calls
                .push((nodes.to_vec(), version.map(str::to_string)));
            if let Some(err) = state.err.clone() {
                return Err(KubeError::NodesUnhealthy(err));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct KubernetesManagerState {
        install_calls: u32,
        err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeKubernetesManager {
        inner: Arc<Mutex<KubernetesManagerState>>,
    }

    impl FakeKubernetesManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail(&self, message: impl Into<String>) {
            self.inner.lock().err = Some(message.into());
        }

        pub fn install_calls(&self) -> u32 {
            self.inner.lock().install_calls
        }
    }

    #[async_trait]
    impl KubernetesManager for FakeKubernetesManager {
        async fn install(&self) -> Result<(), KubeError> {
            let mut state = self.inner.lock();
            state.install_calls += 1;
            if let Some(err) = state.err.clone() {
                return Err(KubeError::Operation(err));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct KubernetesClientState {
        calls: Vec<String>,
        err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeKubernetesClient {
        inner: Arc<Mutex<KubernetesClientState>>,
    }

    impl FakeKubernetesClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail(&self, message: impl Into<String>) {
            self.inner.lock().err = Some(message.into());
        }

        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl KubernetesClient for FakeKubernetesClient {
        async fn wait_for_kubernetes_healthy(&self, endpoint: &str) -> Result<(), KubeError> {
            let mut state = self.inner.lock();
            state.calls.push(endpoint.to_string());
            if let Some(err) = state.err.clone() {
                return Err(KubeError::KubernetesUnhealthy(err));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeClusterClient, FakeKubernetesClient, FakeKubernetesManager};

#[cfg(test)]
#[path = "kube_tests.rs"]
mod tests;
