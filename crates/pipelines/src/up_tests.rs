// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use outpost_collab::config::{DockerConfig, FeatureFlag, VmConfig};
use outpost_collab::{
    Config, ConfigHandler, FakeConfigHandler, FakeContainerRuntime, FakeNetworkManager, FakeStack,
    FakeToolsManager, FakeVirtualMachine,
};
use outpost_registry::Registry;
use outpost_shims::FakeShims;

struct Fixtures {
    shims: Arc<FakeShims>,
    tools_manager: Arc<FakeToolsManager>,
    virtual_machine: Arc<FakeVirtualMachine>,
    container_runtime: Arc<FakeContainerRuntime>,
    network_manager: Arc<FakeNetworkManager>,
    stack: Arc<FakeStack>,
}

fn init(pipeline: &UpPipeline, registry: &Registry, config: Config) -> Fixtures {
    let shims = Arc::new(FakeShims::new());
    let config_handler = Arc::new(FakeConfigHandler::new());
    config_handler.seed_config(config);
    let tools_manager = Arc::new(FakeToolsManager::new());
    let virtual_machine = Arc::new(FakeVirtualMachine::new());
    let container_runtime = Arc::new(FakeContainerRuntime::new());
    let network_manager = Arc::new(FakeNetworkManager::new());
    let stack = Arc::new(FakeStack::new());

    registry.register("shims", shims.clone() as Arc<dyn outpost_shims::Shims>);
    registry.register("configHandler", config_handler as Arc<dyn ConfigHandler>);
    registry.register("toolsManager", tools_manager.clone() as Arc<dyn ToolsManager>);
    registry.register("virtualMachine", virtual_machine.clone() as Arc<dyn VirtualMachine>);
    registry.register(
        "containerRuntime",
        container_runtime.clone() as Arc<dyn ContainerRuntime>,
    );
    registry.register("networkManager", network_manager.clone() as Arc<dyn NetworkManager>);
    registry.register("stack", stack.clone() as Arc<dyn Stack>);

    pipeline
        .initialize(registry, Path::new("/project"), &ParamBag::builder().build())
        .expect("initialize should succeed");

    Fixtures {
        shims,
        tools_manager,
        virtual_machine,
        container_runtime,
        network_manager,
        stack,
    }
}

fn full_config() -> Config {
    Config {
        vm: VmConfig {
            driver: Some("colima".to_string()),
        },
        docker: DockerConfig {
            enabled: Some(true),
            ..Default::default()
        },
        dns: FeatureFlag { enabled: Some(true) },
        ..Default::default()
    }
}

#[tokio::test]
async fn sets_no_cache_and_brings_everything_up_in_order() {
    let registry = Registry::new();
    let pipeline = UpPipeline::new();
    let fixtures = init(&pipeline, &registry, full_config());

    pipeline
        .execute(&ParamBag::builder().build())
        .await
        .expect("execute should succeed");

    assert_eq!(fixtures.shims.get_env("NO_CACHE"), Some("true".to_string()));
    assert_eq!(fixtures.virtual_machine.up_calls(), 1);
    assert_eq!(fixtures.container_runtime.up_calls(), 1);
    assert_eq!(fixtures.network_manager.configure_calls(), 1);
    assert_eq!(fixtures.stack.up_calls(), 1);
}

#[tokio::test]
async fn installs_missing_tools_before_bringing_vm_up() {
    let registry = Registry::new();
    let pipeline = UpPipeline::new();
    let fixtures = init(&pipeline, &registry, full_config());
    fixtures.tools_manager.set_missing(vec!["colima".to_string()]);

    pipeline
        .execute(&ParamBag::builder().build())
        .await
        .expect("execute should succeed");

    assert_eq!(fixtures.tools_manager.install_calls(), 1);
}

#[tokio::test]
async fn skips_vm_and_container_runtime_when_not_configured() {
    let registry = Registry::new();
    let pipeline = UpPipeline::new();
    let fixtures = init(&pipeline, &registry, Config::default());

    pipeline
        .execute(&ParamBag::builder().build())
        .await
        .expect("execute should succeed");

    assert_eq!(fixtures.virtual_machine.up_calls(), 0);
    assert_eq!(fixtures.container_runtime.up_calls(), 0);
    assert_eq!(fixtures.stack.up_calls(), 1);
}

#[tokio::test]
async fn docker_driver_does_not_invoke_vm_up() {
    // spec.md §8 testable property 7: vm.driver="docker" + docker.enabled=true
    // must bring the container runtime up without calling the VM's Up.
    let registry = Registry::new();
    let pipeline = UpPipeline::new();
    let config = Config {
        vm: VmConfig {
            driver: Some("docker".to_string()),
        },
        docker: DockerConfig {
            enabled: Some(true),
            ..Default::default()
        },
        ..Default::default()
    };
    let fixtures = init(&pipeline, &registry, config);

    pipeline
        .execute(&ParamBag::builder().build())
        .await
        .expect("execute should succeed");

    assert_eq!(fixtures.virtual_machine.up_calls(), 0);
    assert_eq!(fixtures.container_runtime.up_calls(), 1);
}

#[tokio::test]
async fn vm_failure_is_wrapped() {
    let registry = Registry::new();
    let pipeline = UpPipeline::new();
    let fixtures = init(&pipeline, &registry, full_config());
    fixtures.virtual_machine.fail_up("colima timed out");

    let err = pipeline
        .execute(&ParamBag::builder().build())
        .await
        .expect_err("should fail");
    assert!(matches!(err, PipelineError::Operation { .. }));
    assert_eq!(fixtures.stack.up_calls(), 0);
}
