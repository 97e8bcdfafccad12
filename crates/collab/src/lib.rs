// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Collaborator contracts: every subsystem the pipeline layer composes
//! through the DI registry (spec.md §4, "Out of scope" in §1 — concrete
//! implementations of bundlers, VM drivers, container runtimes, etc. are
//! external collaborators; this crate only defines their contracts, plus
//! a `NoOp` real implementation sufficient to wire and a `Fake` for tests).

pub mod artifact;
pub mod blueprint;
pub mod config;
pub mod env_printer;
pub mod generator;
pub mod infra;
pub mod kube;
pub mod secrets;
pub mod service;
pub mod shell;
pub mod stack;
pub mod terraform;
pub mod tools;

pub use artifact::{
    ArtifactBuilder, ArtifactError, Bundler, KustomizeBundler, NoOpArtifactBuilder,
    TemplateBundler, TerraformBundler,
};
pub use blueprint::{BlueprintError, BlueprintHandler, LocalBlueprintHandler};
pub use config::{Config, ConfigError, ConfigHandler, DefaultsKind, YamlConfigHandler};
pub use env_printer::{merge_printers, EnvPrinter, EnvPrinterError, StaticEnvPrinter};
pub use generator::{Generator, GeneratorError, GitGenerator, TerraformGenerator};
pub use infra::{
    ColimaNetworkManager, ColimaVirtualMachine, ContainerRuntime, DockerContainerRuntime,
    InfraError, NetworkInterfaceProvider, NetworkManager, NoOpContainerRuntime,
    NoOpNetworkInterfaceProvider, NoOpNetworkManager, NoOpSecureShell, NoOpSshClient,
    SecureShell, SshClient, VirtualMachine,
};
pub use kube::{
    ClusterClient, KubeError, KubernetesClient, KubernetesManager, NoOpClusterClient,
    NoOpKubernetesClient, NoOpKubernetesManager,
};
pub use secrets::{
    NoOpSecretsProvider, OnePasswordSecretsProvider, SecretsError, SecretsProvider,
    SopsSecretsProvider,
};
pub use service::{
    ClusterNodeService, DnsService, GitLivereloadService, LocalstackService, NoOpService,
    RegistryService, Service, ServiceError,
};
pub use shell::{RealShell, Shell, ShellError};
pub use stack::{NoOpStack, Stack, StackError};
pub use terraform::{
    NoOpTerraformResolver, OciTerraformResolver, StandardTerraformResolver, TerraformError,
    TerraformResolver,
};
pub use tools::{NoOpToolsManager, ToolsError, ToolsManager};

#[cfg(any(test, feature = "test-support"))]
pub use artifact::{ArtifactCall, FakeArtifactBuilder};
#[cfg(any(test, feature = "test-support"))]
pub use blueprint::FakeBlueprintHandler;
#[cfg(any(test, feature = "test-support"))]
pub use config::FakeConfigHandler;
#[cfg(any(test, feature = "test-support"))]
pub use infra::{FakeContainerRuntime, FakeNetworkManager, FakeVirtualMachine};
#[cfg(any(test, feature = "test-support"))]
pub use kube::{FakeClusterClient, FakeKubernetesClient, FakeKubernetesManager};
#[cfg(any(test, feature = "test-support"))]
pub use secrets::FakeSecretsProvider;
#[cfg(any(test, feature = "test-support"))]
pub use shell::{FakeShell, ShellCall};
#[cfg(any(test, feature = "test-support"))]
pub use stack::FakeStack;
#[cfg(any(test, feature = "test-support"))]
pub use tools::FakeToolsManager;
