// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! InitPipeline (spec.md §4.6, the most complex pipeline): turn an empty
//! or partially configured project into one with a valid context,
//! defaults applied, blueprint loaded, Terraform modules resolved, and
//! per-component configuration files written.

use crate::base::{
    defaults_kind_for, default_vm_driver, determine_context_name, prepare_template_data,
    with_artifact_builder, with_blueprint_handler, with_container_runtime, with_env_printers,
    with_generators, with_kubernetes_client, with_kubernetes_manager, with_networking,
    with_services, with_stack, with_terraform_resolvers, with_tools_manager, with_virtual_machine,
    BasePipeline, Networking,
};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use outpost_collab::{
    ArtifactBuilder, BlueprintHandler, ConfigHandler, ContainerRuntime, Generator,
    KubernetesClient, KubernetesManager, NetworkManager, SecureShell, Service, Shell, Stack,
    TerraformResolver, ToolsManager, VirtualMachine,
};
use outpost_core::{ParamBag, Value};
use outpost_registry::Registry;
use outpost_shims::Shims;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The built-in OCI reference used when no explicit blueprint is given and
/// no local templates exist (spec.md §4.6 Execute step 2).
const DEFAULT_BLUEPRINT_OCI_URL: &str = "oci://ghcr.io/windsorcli/core:v0.1.0";

struct State {
    shims: Arc<dyn Shims>,
    shell: Arc<dyn Shell>,
    config_handler: Arc<dyn ConfigHandler>,
    project_root: PathBuf,
    kubernetes_client: Arc<dyn KubernetesClient>,
    #[allow(dead_code)]
    kubernetes_manager: Arc<dyn KubernetesManager>,
    blueprint_handler: Arc<dyn BlueprintHandler>,
    tools_manager: Arc<dyn ToolsManager>,
    #[allow(dead_code)]
    stack: Arc<dyn Stack>,
    artifact_builder: Arc<dyn ArtifactBuilder>,
    generators: Vec<Arc<dyn Generator>>,
    services: Vec<Arc<dyn Service>>,
    terraform_resolvers: Vec<Arc<dyn TerraformResolver>>,
    #[allow(dead_code)]
    network_manager: Arc<dyn NetworkManager>,
    virtual_machine: Option<Arc<dyn VirtualMachine>>,
    container_runtime: Option<Arc<dyn ContainerRuntime>>,
    #[allow(dead_code)]
    secure_shell: Arc<dyn SecureShell>,
}

pub struct InitPipeline {
    state: Mutex<Option<State>>,
}

impl InitPipeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// `isLocalContext` (spec.md §4.6 step 3): the existing provider is
    /// `generic` and the context matches `local`/`local-*`, or the
    /// context name itself does.
    fn is_local_context(context_name: &str, provider: Option<&str>) -> bool {
        let context_is_local = context_name == "local" || context_name.starts_with("local-");
        let provider_says_local = provider == Some("generic") && context_is_local;
        context_is_local || provider_says_local
    }
}

impl Default for InitPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pipeline for InitPipeline {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), PipelineError> {
        // BasePipeline::initialize must not call LoadConfig yet — Init is
        // the pipeline that creates the context on disk (spec.md §4.3
        // step 9, §4.6 preamble).
        let init_bag = bag.derive("initPipeline", Value::Bool(true));
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), &init_bag)?;

        let context_name = determine_context_name(bag, base.config_handler.as_ref());
        base.config_handler.set_context(&context_name);

        if !base.config_handler.is_loaded() {
            let config = base.config_handler.config();
            let is_local = Self::is_local_context(&context_name, config.provider.as_deref());

            let default_driver = if is_local && config.vm.driver.is_none() {
                Some(default_vm_driver())
            } else {
                None
            };
            let driver_for_defaults = config.vm.driver.as_deref().or(default_driver);
            base.config_handler
                .apply_defaults(defaults_kind_for(driver_for_defaults, is_local));

            if let Some(driver) = default_driver {
                base.config_handler.set_vm_driver(driver);
            }
            if is_local && config.provider.is_none() {
                base.config_handler.set_provider("generic");
            }

            let provider = base.config_handler.config().provider;
            if let Some(provider) = provider.as_deref().filter(|p| !p.is_empty()) {
                base.config_handler.apply_provider_overrides(provider);
            }

            let context_id = base.config_handler.generate_context_id();
            tracing::debug!(context_id = %context_id, "generated fresh context id");

            base.config_handler
                .save_config(bag.bool("hasSetFlags"))
                .map_err(|e| PipelineError::operation("saving configuration", e))?;
            base.config_handler
                .load_config()
                .map_err(|e| PipelineError::operation("loading configuration", e))?;
        }

        let config = base.config_handler.config();

        let kubernetes_client = with_kubernetes_client(registry);
        let kubernetes_manager = with_kubernetes_manager(registry);
        let blueprint_handler = with_blueprint_handler(registry);
        let tools_manager = with_tools_manager(registry);
        // terraformEnv must be resolvable by the stack subsystem even when
        // terraform is disabled (spec.md §4.3 withEnvPrinters).
        with_env_printers(registry, &config, &context_name);
        let stack = with_stack(registry);
        let artifact_builder = with_artifact_builder(registry);
        let generators = with_generators(registry, &config);
        let services = with_services(registry, &config);
        let terraform_resolvers = with_terraform_resolvers(registry, &config, &base.project_root);
        let Networking {
            manager: network_manager,
            secure_shell,
            ..
        } = with_networking(registry, &config);
        let virtual_machine = with_virtual_machine(registry, &config);
        let container_runtime = with_container_runtime(registry, &config, &base.project_root);

        kubernetes_client
            .init()
            .map_err(|e| PipelineError::wiring("kubernetesClient", e))?;
        kubernetes_manager
            .init()
            .map_err(|e| PipelineError::wiring("kubernetesManager", e))?;
        blueprint_handler
            .init()
            .map_err(|e| PipelineError::wiring("blueprintHandler", e))?;
        tools_manager
            .init()
            .map_err(|e| PipelineError::wiring("toolsManager", e))?;
        stack.init().map_err(|e| PipelineError::wiring("stack", e))?;
        artifact_builder
            .init()
            .map_err(|e| PipelineError::wiring("artifactBuilder", e))?;
        for generator in &generators {
            generator
                .init()
                .map_err(|e| PipelineError::wiring(format!("generator.{}", generator.name()), e))?;
        }
        for service in &services {
            service
                .init()
                .map_err(|e| PipelineError::wiring(format!("service.{}", service.name()), e))?;
        }
        for resolver in &terraform_resolvers {
            resolver
                .init()
                .map_err(|e| PipelineError::wiring(format!("terraformResolver.{}", resolver.kind()), e))?;
        }
        network_manager
            .init()
            .map_err(|e| PipelineError::wiring("networkManager", e))?;
        if let Some(vm) = &virtual_machine {
            vm.init().map_err(|e| PipelineError::wiring("virtualMachine", e))?;
        }
        if let Some(runtime) = &container_runtime {
            runtime
                .init()
                .map_err(|e| PipelineError::wiring("containerRuntime", e))?;
        }
        secure_shell
            .init()
            .map_err(|e| PipelineError::wiring("secureShell", e))?;

        *self.state.lock() = Some(State {
            shims: base.shims.clone(),
            shell: base.shell.clone(),
            config_handler: base.config_handler.clone(),
            project_root: base.project_root.clone(),
            kubernetes_client,
            kubernetes_manager,
            blueprint_handler,
            tools_manager,
            stack,
            artifact_builder,
            generators,
            services,
            terraform_resolvers,
            network_manager,
            virtual_machine,
            container_runtime,
            secure_shell,
        });
        Ok(())
    }

    async fn execute(&self, bag: &ParamBag) -> Result<(), PipelineError> {
        let (
            shims,
            shell,
            config_handler,
            project_root,
            blueprint_handler,
            tools_manager,
            artifact_builder,
            generators,
            services,
            terraform_resolvers,
            virtual_machine,
            container_runtime,
        ) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or(PipelineError::NotInitialized)?;
            (
                state.shims.clone(),
                state.shell.clone(),
                state.config_handler.clone(),
                state.project_root.clone(),
                state.blueprint_handler.clone(),
                state.tools_manager.clone(),
                state.artifact_builder.clone(),
                state.generators.clone(),
                state.services.clone(),
                state.terraform_resolvers.clone(),
                state.virtual_machine.clone(),
                state.container_runtime.clone(),
            )
        };

        shell
            .write_reset_token()
            .map_err(|e| PipelineError::operation("writing reset token", e))?;

        let has_local_templates = shims.stat(&project_root.join("contexts/_template")).is_dir;
        let fallback_url = if bag.str("blueprint").is_none() && !has_local_templates {
            DEFAULT_BLUEPRINT_OCI_URL
        } else {
            ""
        };

        let config_root = config_handler.context_root();
        let reset = bag.bool("reset");
        let blueprint_path_exists = shims.stat(&config_root.join("blueprint.yaml")).exists;

        if reset || !blueprint_path_exists {
            let derived_bag = bag.derive("blueprint", Value::Str(fallback_url.to_string()));
            let template_data =
                prepare_template_data(&derived_bag, blueprint_handler.as_ref(), fallback_url);
            blueprint_handler
                .load_from_template(&template_data)
                .map_err(|e| PipelineError::operation("loading blueprint", e))?;
        } else {
            blueprint_handler
                .load_config()
                .map_err(|e| PipelineError::operation("loading blueprint", e))?;
        }

        if !blueprint_handler.is_local() {
            for source in blueprint_handler.oci_sources() {
                artifact_builder
                    .fetch(&source)
                    .map_err(|e| PipelineError::operation("fetching blueprint artifact", e))?;
            }
        }

        blueprint_handler
            .write(reset)
            .map_err(|e| PipelineError::operation("writing blueprint", e))?;

        // "process modules" resolves the default module name every
        // generator writes (spec.md §4.6 step 5, §4.3 TerraformGenerator).
        for resolver in &terraform_resolvers {
            resolver
                .resolve("main")
                .map_err(|e| PipelineError::operation(format!("resolving terraform module ({})", resolver.kind()), e))?;
        }

        let template_data = HashMap::new();
        for generator in &generators {
            let files = generator
                .generate(&template_data)
                .map_err(|e| PipelineError::operation(format!("running {} generator", generator.name()), e))?;
            for (path, contents) in files {
                let full_path = project_root.join(path);
                if let Some(parent) = full_path.parent() {
                    shims
                        .mkdir_all(parent)
                        .map_err(|e| PipelineError::operation("writing generated file", e))?;
                }
                shims
                    .write_file(&full_path, &contents)
                    .map_err(|e| PipelineError::operation("writing generated file", e))?;
            }
        }

        tools_manager
            .write_manifest(&project_root)
            .map_err(|e| PipelineError::operation("writing tools manifest", e))?;

        let compose_dir = project_root.join(".windsor").join("compose");
        for service in &services {
            let fragment = service
                .compose_fragment()
                .map_err(|e| PipelineError::operation(format!("building {} service config", service.name()), e))?;
            shims
                .mkdir_all(&compose_dir)
                .map_err(|e| PipelineError::operation("writing service config", e))?;
            shims
                .write_file(&compose_dir.join(format!("{}.yaml", service.name())), fragment.as_bytes())
                .map_err(|e| PipelineError::operation("writing service config", e))?;
        }

        if let Some(vm) = &virtual_machine {
            vm.write_config(&project_root)
                .map_err(|e| PipelineError::operation("writing virtual machine config", e))?;
        }
        if let Some(runtime) = &container_runtime {
            runtime
                .write_config(&project_root)
                .map_err(|e| PipelineError::operation("writing container runtime config", e))?;
        }

        config_handler
            .save_config(bag.bool("hasSetFlags"))
            .map_err(|e| PipelineError::operation("saving configuration", e))?;

        eprintln!("Initialization successful");

        Ok(())
    }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
