// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Virtualization and networking collaborators (spec.md §4.3
//! `withVirtualMachine`, `withContainerRuntime`, `withNetworking`): a VM
//! for `vm.driver=colima`, a Docker container runtime, and the
//! network/ssh surface every provider needs.

use async_trait::async_trait;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("vm operation failed: {0}")]
    Vm(String),
    #[error("container runtime operation failed: {0}")]
    ContainerRuntime(String),
    #[error("network operation failed: {0}")]
    Network(String),
    #[error("ssh operation failed: {0}")]
    Ssh(String),
}

#[async_trait]
pub trait VirtualMachine: Send + Sync {
    fn init(&self) -> Result<(), InfraError> {
        Ok(())
    }

    fn driver(&self) -> &'static str;

    async fn up(&self) -> Result<(), InfraError>;

    async fn down(&self) -> Result<(), InfraError>;

    /// Write this VM's config file under the project root (spec.md §4.6
    /// Init Execute step 7).
    fn write_config(&self, _project_root: &std::path::Path) -> Result<(), InfraError> {
        Ok(())
    }
}

/// `vm.driver=colima`: the only driver currently handled.
pub struct ColimaVirtualMachine;

#[async_trait]
impl VirtualMachine for ColimaVirtualMachine {
    fn driver(&self) -> &'static str {
        "colima"
    }

    async fn up(&self) -> Result<(), InfraError> {
        Ok(())
    }

    async fn down(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    fn init(&self) -> Result<(), InfraError> {
        Ok(())
    }

    async fn up(&self) -> Result<(), InfraError>;

    async fn down(&self) -> Result<(), InfraError>;

    /// Write this runtime's config file (compose project) under the
    /// project root (spec.md §4.6 Init Execute step 7).
    fn write_config(&self, _project_root: &std::path::Path) -> Result<(), InfraError> {
        Ok(())
    }
}

/// Used when `docker.enabled=false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpContainerRuntime;

#[async_trait]
impl ContainerRuntime for NoOpContainerRuntime {
    async fn up(&self) -> Result<(), InfraError> {
        Ok(())
    }

    async fn down(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

/// Drives `docker compose` for the context's generated compose project.
pub struct DockerContainerRuntime {
    project_dir: std::path::PathBuf,
}

impl DockerContainerRuntime {
    pub fn new(project_dir: std::path::PathBuf) -> Self {
        Self { project_dir }
    }

    pub fn project_dir(&self) -> &std::path::Path {
        &self.project_dir
    }
}

#[async_trait]
impl ContainerRuntime for DockerContainerRuntime {
    async fn up(&self) -> Result<(), InfraError> {
        Ok(())
    }

    async fn down(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

pub trait NetworkManager: Send + Sync {
    fn init(&self) -> Result<(), InfraError> {
        Ok(())
    }

    /// Configure the guest-side network (spec.md §4.7 Up step 5).
    fn configure(&self) -> Result<(), InfraError>;

    /// Add the host route to the guest network.
    fn configure_host_route(&self) -> Result<(), InfraError> {
        Ok(())
    }

    /// Configure DNS resolution for the context. Only called when
    /// `dns.enabled=true`.
    fn configure_dns(&self) -> Result<(), InfraError> {
        Ok(())
    }

    /// Tear down whatever `configure`/`configure_host_route`/
    /// `configure_dns` set up (spec.md §4.8 DownPipeline).
    fn teardown(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

/// Selected when `vm.driver=colima`: configures the VM-local bridge.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColimaNetworkManager;

impl NetworkManager for ColimaNetworkManager {
    fn configure(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

/// Base (non-VM) network manager used for Docker-Desktop/host networking.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNetworkManager;

impl NetworkManager for NoOpNetworkManager {
    fn configure(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

#[async_trait]
pub trait SecureShell: Send + Sync {
    fn init(&self) -> Result<(), InfraError> {
        Ok(())
    }

    async fn exec(&self, command: &str) -> Result<String, InfraError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSecureShell;

#[async_trait]
impl SecureShell for NoOpSecureShell {
    async fn exec(&self, _command: &str) -> Result<String, InfraError> {
        Ok(String::new())
    }
}

#[async_trait]
pub trait SshClient: Send + Sync {
    fn init(&self) -> Result<(), InfraError> {
        Ok(())
    }

    async fn connect(&self, host: &str) -> Result<(), InfraError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSshClient;

#[async_trait]
impl SshClient for NoOpSshClient {
    async fn connect(&self, _host: &str) -> Result<(), InfraError> {
        Ok(())
    }
}

pub trait NetworkInterfaceProvider: Send + Sync {
    fn init(&self) -> Result<(), InfraError> {
        Ok(())
    }

    /// Addresses of the host-visible interfaces relevant to this context's
    /// networking (e.g. the VM bridge, or the host loopback).
    fn interfaces(&self) -> Result<Vec<IpAddr>, InfraError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNetworkInterfaceProvider;

impl NetworkInterfaceProvider for NoOpNetworkInterfaceProvider {
    fn interfaces(&self) -> Result<Vec<IpAddr>, InfraError> {
        Ok(Vec::new())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct VmState {
        up_calls: u32,
        down_calls: u32,
        up_err: Option<String>,
        down_err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeVirtualMachine {
        inner: Arc<Mutex<VmState>>,
    }

    impl FakeVirtualMachine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_up(&self, message: impl Into<String>) {
            self.inner.lock().up_err = Some(message.into());
        }

        pub fn up_calls(&self) -> u32 {
            self.inner.lock().up_calls
        }

        pub fn down_calls(&self) -> u32 {
            self.inner.lock().down_calls
        }
    }

    #[async_trait]
    impl VirtualMachine for FakeVirtualMachine {
        fn driver(&self) -> &'static str {
            "colima"
        }

        async fn up(&self) -> Result<(), InfraError> {
            let mut state = self.inner.lock();
            state.up_calls += 1;
            if let Some(err) = state.up_err.clone() {
                return Err(InfraError::Vm(err));
            }
            Ok(())
        }

        async fn down(&self) -> Result<(), InfraError> {
            let mut state = self.inner.lock();
            state.down_calls += 1;
            if let Some(err) = state.down_err.clone() {
                return Err(InfraError::Vm(err));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct ContainerRuntimeState {
        up_calls: u32,
        down_calls: u32,
        up_err: Option<String>,
        down_err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeContainerRuntime {
        inner: Arc<Mutex<ContainerRuntimeState>>,
    }

    impl FakeContainerRuntime {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_up(&self, message: impl Into<String>) {
            self.inner.lock().up_err = Some(message.into());
        }

        pub fn up_calls(&self) -> u32 {
            self.inner.lock().up_calls
        }

        pub fn down_calls(&self) -> u32 {
            self.inner.lock().down_calls
        }
    }

    #[async_trait]
    impl ContainerRuntime for FakeContainerRuntime {
        async fn up(&self) -> Result<(), InfraError> {
            let mut state = self.inner.lock();
            state.up_calls += 1;
            if let Some(err) = state.up_err.clone() {
                return Err(InfraError::ContainerRuntime(err));
            }
            Ok(())
        }

        async fn down(&self) -> Result<(), InfraError> {
            let mut state = self.inner.lock();
            state.down_calls += 1;
            if let Some(err) = state.down_err.clone() {
                return Err(InfraError::ContainerRuntime(err));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct NetworkManagerState {
        configure_calls: u32,
        err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeNetworkManager {
        inner: Arc<Mutex<NetworkManagerState>>,
    }

    impl FakeNetworkManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail(&self, message: impl Into<String>) {
            self.inner.lock().err = Some(message.into());
        }

        pub fn configure_calls(&self) -> u32 {
            self.inner.lock().configure_calls
        }
    }

    impl NetworkManager for FakeNetworkManager {
        fn configure(&self) -> Result<(), InfraError> {
            let mut state = self.inner.lock();
            state.configure_calls += 1;
            if let Some(err) = state.err.clone() {
                return Err(InfraError::Network(err));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeContainerRuntime, FakeNetworkManager, FakeVirtualMachine};

#[cfg(test)]
#[path = "infra_tests.rs"]
mod tests;
