// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BasePipeline`: the wiring helpers and common collaborators every
//! concrete pipeline composes (spec.md §4.2/§4.3). Rust has no
//! implementation inheritance, so "inheriting" `BasePipeline` becomes
//! holding a `base: BasePipeline` field and delegating to its free-function
//! wiring helpers, mirroring how the teacher's `Runtime<S, A, N, C>`
//! composes adapters by generic parameter rather than subclassing.

use crate::error::PipelineError;
use outpost_collab::{
    ArtifactBuilder, BlueprintHandler, ClusterClient, Config, ConfigHandler, DefaultsKind,
    EnvPrinter, Generator, GitGenerator, KubernetesClient, KubernetesManager,
    LocalBlueprintHandler, NoOpArtifactBuilder, NoOpClusterClient, NoOpKubernetesClient,
    NoOpKubernetesManager, NoOpSecureShell, NoOpSshClient, NoOpStack, NoOpToolsManager,
    OnePasswordSecretsProvider, RealShell, SecureShell, SecretsProvider, Service, Shell,
    SopsSecretsProvider, SshClient, Stack, StaticEnvPrinter, TerraformGenerator, ToolsManager,
};
use outpost_core::ParamBag;
use outpost_registry::Registry;
use outpost_shims::Shims;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Collaborators guaranteed present after `BasePipeline::initialize`
/// (spec.md Invariant 2).
pub struct BasePipeline {
    pub shims: Arc<dyn Shims>,
    pub shell: Arc<dyn Shell>,
    pub config_handler: Arc<dyn ConfigHandler>,
    pub project_root: PathBuf,
}

impl BasePipeline {
    /// Resolve or create the three collaborators every pipeline needs, then
    /// run the full spec.md §4.3 cascade: init shell, apply `trust`/`verbose`
    /// from the bag, init the config handler, load the base config file,
    /// select the context, and (unless `initPipeline=true`) sync in-memory
    /// state for it.
    pub fn initialize(
        registry: &Registry,
        project_root: PathBuf,
        bag: &ParamBag,
    ) -> Result<Self, PipelineError> {
        let shims = with_shims(registry);
        let shell = with_shell(registry, shims.clone(), &project_root);
        let config_handler = with_config_handler(registry, shims.clone());

        shell
            .init()
            .map_err(|e| PipelineError::wiring("shell", e))?;

        if bag.bool("trust") {
            shell
                .add_trusted(&project_root)
                .map_err(|e| PipelineError::operation("adding trusted directory", e))?;
        }
        if bag.bool("verbose") {
            shell.set_verbose(true);
        }

        config_handler
            .init()
            .map_err(|e| PipelineError::wiring("configHandler", e))?;
        config_handler
            .load_base(&project_root)
            .map_err(|e| PipelineError::operation("loading configuration", e))?;

        if let Some(name) = bag.str("contextName") {
            if !name.is_empty() {
                config_handler.set_context(name);
            }
        }

        if !bag.bool("initPipeline") {
            config_handler
                .load_config()
                .map_err(|e| PipelineError::operation("loading configuration", e))?;
        }

        Ok(Self {
            shims,
            shell,
            config_handler,
            project_root,
        })
    }

    pub fn config(&self) -> Config {
        self.config_handler.config()
    }
}

/// Entry in the `PipelineFactory` table for the bare name `basePipeline`
/// (spec.md §4.2): `Initialize` runs the common cascade; `Execute` is a
/// no-op, since every concrete pipeline overrides it instead of extending
/// this one (Rust has no implementation inheritance to override).
#[derive(Default)]
pub struct BasePipelineHandle {
    state: parking_lot::Mutex<Option<BasePipeline>>,
}

impl BasePipelineHandle {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl crate::pipeline::Pipeline for BasePipelineHandle {
    fn initialize(
        &self,
        registry: &Registry,
        project_root: &Path,
        bag: &ParamBag,
    ) -> Result<(), crate::error::PipelineError> {
        let base = BasePipeline::initialize(registry, project_root.to_path_buf(), bag)?;
        *self.state.lock() = Some(base);
        Ok(())
    }

    async fn execute(&self, _bag: &ParamBag) -> Result<(), crate::error::PipelineError> {
        Ok(())
    }
}

pub fn with_shims(registry: &Registry) -> Arc<dyn Shims> {
    registry.resolve_or_create("shims", || {
        Arc::new(outpost_shims::OsShims) as Arc<dyn Shims>
    })
}

pub fn with_shell(registry: &Registry, shims: Arc<dyn Shims>, project_root: &Path) -> Arc<dyn Shell> {
    let state_dir = project_root.join(".windsor");
    registry.resolve_or_create("shell", || {
        Arc::new(RealShell::new(shims, state_dir)) as Arc<dyn Shell>
    })
}

pub fn with_config_handler(registry: &Registry, shims: Arc<dyn Shims>) -> Arc<dyn ConfigHandler> {
    registry.resolve_or_create("configHandler", || {
        Arc::new(outpost_collab::YamlConfigHandler::new(shims)) as Arc<dyn ConfigHandler>
    })
}

pub fn with_artifact_builder(registry: &Registry) -> Arc<dyn ArtifactBuilder> {
    registry.resolve_or_create("artifactBuilder", || {
        Arc::new(NoOpArtifactBuilder::new()) as Arc<dyn ArtifactBuilder>
    })
}

pub fn with_blueprint_handler(registry: &Registry) -> Arc<dyn BlueprintHandler> {
    registry.resolve_or_create("blueprintHandler", || {
        Arc::new(LocalBlueprintHandler::new()) as Arc<dyn BlueprintHandler>
    })
}

pub fn with_tools_manager(registry: &Registry) -> Arc<dyn ToolsManager> {
    registry.resolve_or_create("toolsManager", || {
        Arc::new(NoOpToolsManager) as Arc<dyn ToolsManager>
    })
}

pub fn with_stack(registry: &Registry) -> Arc<dyn Stack> {
    registry.resolve_or_create("stack", || Arc::new(NoOpStack) as Arc<dyn Stack>)
}

pub fn with_cluster_client(registry: &Registry) -> Arc<dyn ClusterClient> {
    registry.resolve_or_create("clusterClient", || {
        Arc::new(NoOpClusterClient) as Arc<dyn ClusterClient>
    })
}

pub fn with_kubernetes_client(registry: &Registry) -> Arc<dyn KubernetesClient> {
    registry.resolve_or_create("kubernetesClient", || {
        Arc::new(NoOpKubernetesClient) as Arc<dyn KubernetesClient>
    })
}

pub fn with_kubernetes_manager(registry: &Registry) -> Arc<dyn KubernetesManager> {
    registry.resolve_or_create("kubernetesManager", || {
        Arc::new(NoOpKubernetesManager) as Arc<dyn KubernetesManager>
    })
}

/// **handleSessionReset** (spec.md §4.3 common helpers). If no
/// `WINDSOR_SESSION_TOKEN` is set, force a reset; otherwise honor the
/// shell's own reset-flag check. On reset, write the reset token and
/// set `NO_CACHE=true`.
pub fn handle_session_reset(
    shell: &dyn Shell,
    shims: &dyn Shims,
    quiet: bool,
) -> Result<(), PipelineError> {
    let no_token = shims.get_env("WINDSOR_SESSION_TOKEN").is_none();
    let should_reset = no_token || shell.wants_reset();
    if should_reset {
        shell
            .reset(quiet)
            .map_err(|e| PipelineError::operation("resetting session", e))?;
        shims.set_env("NO_CACHE", "true");
    }
    Ok(())
}

/// **prepareTemplateData** (spec.md §4.3). Priority: explicit `blueprint`
/// bag key, then local templates via the blueprint handler, then the
/// default built-in OCI URL, then the handler's own defaults.
pub fn prepare_template_data(
    bag: &ParamBag,
    blueprint_handler: &dyn outpost_collab::BlueprintHandler,
    fallback_oci_url: &str,
) -> Vec<u8> {
    if let Some(explicit) = bag.str("blueprint") {
        if !explicit.is_empty() {
            return format!("oci://{explicit}").into_bytes();
        }
    }
    if let Some(local) = blueprint_handler.local_template_data() {
        return local;
    }
    if !fallback_oci_url.is_empty() {
        return fallback_oci_url.as_bytes().to_vec();
    }
    blueprint_handler.default_template_data()
}

/// **determineContextName** (spec.md §4.3). `contextName` from the bag,
/// else the non-`local` context stored in config, else `"local"`.
pub fn determine_context_name(bag: &ParamBag, config_handler: &dyn ConfigHandler) -> String {
    if let Some(name) = bag.str("contextName") {
        if !name.is_empty() {
            return name.to_string();
        }
    }
    if let Some(existing) = config_handler.context() {
        if existing != "local" {
            return existing;
        }
    }
    "local".to_string()
}

/// **withVirtualMachine** — only `vm.driver=colima` is handled.
pub fn with_virtual_machine(
    registry: &Registry,
    config: &Config,
) -> Option<Arc<dyn outpost_collab::VirtualMachine>> {
    match config.vm.driver.as_deref() {
        Some("colima") => Some(registry.resolve_or_create("virtualMachine", || {
            Arc::new(outpost_collab::ColimaVirtualMachine) as Arc<dyn outpost_collab::VirtualMachine>
        })),
        _ => None,
    }
}

/// **withContainerRuntime** — only when `docker.enabled=true`.
pub fn with_container_runtime(
    registry: &Registry,
    config: &Config,
    project_root: &Path,
) -> Option<Arc<dyn outpost_collab::ContainerRuntime>> {
    if config.docker.enabled == Some(true) {
        let root = project_root.to_path_buf();
        Some(registry.resolve_or_create("containerRuntime", || {
            Arc::new(outpost_collab::DockerContainerRuntime::new(root))
                as Arc<dyn outpost_collab::ContainerRuntime>
        }))
    } else {
        None
    }
}

/// **withNetworking** — also ensures `sshClient`, `secureShell`,
/// `networkInterfaceProvider` exist; the manager variant is selected by
/// `vm.driver`.
pub struct Networking {
    pub manager: Arc<dyn outpost_collab::NetworkManager>,
    pub ssh_client: Arc<dyn SshClient>,
    pub secure_shell: Arc<dyn SecureShell>,
    pub interface_provider: Arc<dyn outpost_collab::NetworkInterfaceProvider>,
}

pub fn with_networking(registry: &Registry, config: &Config) -> Networking {
    let manager = if config.vm.driver.as_deref() == Some("colima") {
        registry.resolve_or_create("networkManager", || {
            Arc::new(outpost_collab::ColimaNetworkManager) as Arc<dyn outpost_collab::NetworkManager>
        })
    } else {
        registry.resolve_or_create("networkManager", || {
            Arc::new(outpost_collab::NoOpNetworkManager) as Arc<dyn outpost_collab::NetworkManager>
        })
    };
    let ssh_client = registry
        .resolve_or_create("sshClient", || Arc::new(NoOpSshClient) as Arc<dyn SshClient>);
    let secure_shell = registry
        .resolve_or_create("secureShell", || Arc::new(NoOpSecureShell) as Arc<dyn SecureShell>);
    let interface_provider = registry.resolve_or_create("networkInterfaceProvider", || {
        Arc::new(outpost_collab::NoOpNetworkInterfaceProvider)
            as Arc<dyn outpost_collab::NetworkInterfaceProvider>
    });
    Networking {
        manager,
        ssh_client,
        secure_shell,
        interface_provider,
    }
}

/// **withGenerators** — git always, terraform iff `terraform.enabled`.
pub fn with_generators(registry: &Registry, config: &Config) -> Vec<Arc<dyn Generator>> {
    let mut generators: Vec<Arc<dyn Generator>> = vec![registry
        .resolve_or_create("gitGenerator", || Arc::new(GitGenerator) as Arc<dyn Generator>)];
    if config.terraform.enabled == Some(true) {
        generators.push(registry.resolve_or_create("terraformGenerator", || {
            Arc::new(TerraformGenerator) as Arc<dyn Generator>
        }));
    }
    generators
}

/// **withEnvPrinters** — conditionally creates provider printers, a
/// cluster-driver printer for talos/omni, always registers `terraformEnv`
/// (even when terraform is disabled, since the stack subsystem resolves
/// it unconditionally), and always appends the Windsor printer last.
pub fn with_env_printers(
    registry: &Registry,
    config: &Config,
    context_name: &str,
) -> Vec<Arc<dyn EnvPrinter>> {
    let mut printers: Vec<Arc<dyn EnvPrinter>> = Vec::new();

    if config.aws.enabled == Some(true) {
        printers.push(registry.resolve_or_create("awsEnv", || {
            Arc::new(StaticEnvPrinter::aws(None)) as Arc<dyn EnvPrinter>
        }));
    }
    if config.azure.enabled == Some(true) {
        printers.push(registry.resolve_or_create("azureEnv", || {
            Arc::new(StaticEnvPrinter::azure(None)) as Arc<dyn EnvPrinter>
        }));
    }
    if config.docker.enabled == Some(true) {
        printers.push(registry.resolve_or_create("dockerEnv", || {
            Arc::new(StaticEnvPrinter::docker(None)) as Arc<dyn EnvPrinter>
        }));
    }

    let terraform_env = registry.resolve_or_create("terraformEnv", || {
        Arc::new(StaticEnvPrinter::terraform(None)) as Arc<dyn EnvPrinter>
    });
    if config.terraform.enabled == Some(true) {
        printers.push(terraform_env);
    }

    if let Some(driver) = config.cluster.driver.as_deref() {
        if driver == "talos" || driver == "omni" {
            printers.push(registry.resolve_or_create("clusterEnv", || {
                Arc::new(StaticEnvPrinter::cluster(driver)) as Arc<dyn EnvPrinter>
            }));
            printers.push(registry.resolve_or_create("clusterDriverEnv", || {
                Arc::new(StaticEnvPrinter::cluster_driver(driver, None)) as Arc<dyn EnvPrinter>
            }));
        }
    }

    printers.push(registry.resolve_or_create("windsorEnv", || {
        Arc::new(StaticEnvPrinter::windsor(context_name)) as Arc<dyn EnvPrinter>
    }));

    printers
}

/// **withSecretsProviders** — a SOPS provider if an encrypted file exists
/// in the config root, plus one 1Password provider per configured vault.
pub fn with_secrets_providers(
    registry: &Registry,
    config: &Config,
    shims: &dyn Shims,
    config_root: &Path,
) -> Vec<Arc<dyn SecretsProvider>> {
    let mut providers: Vec<Arc<dyn SecretsProvider>> = Vec::new();

    for candidate in ["secrets.enc.yaml", "secrets.enc.yml"] {
        let path = config_root.join(candidate);
        if shims.stat(&path).exists {
            providers.push(registry.resolve_or_create("sopsSecretsProvider", || {
                Arc::new(SopsSecretsProvider::new(path.clone())) as Arc<dyn SecretsProvider>
            }));
            break;
        }
    }

    let token = shims.get_env("OP_SERVICE_ACCOUNT_TOKEN");
    for (index, (vault_name, _vault)) in config.secrets.onepassword.vaults.iter().enumerate() {
        let key = format!("secretsProvider_{index}");
        let vault_name = vault_name.clone();
        let token = token.clone();
        providers.push(registry.resolve_or_create(&key, || {
            Arc::new(OnePasswordSecretsProvider::new(vault_name, token.as_deref()))
                as Arc<dyn SecretsProvider>
        }));
    }

    providers
}

/// **withServices** — empty when `docker.enabled=false`; otherwise adds
/// DNS, git-livereload, localstack, per-registry, and per-cluster-node
/// services as configured.
pub fn with_services(registry: &Registry, config: &Config) -> Vec<Arc<dyn Service>> {
    if config.docker.enabled != Some(true) {
        return Vec::new();
    }

    let mut services: Vec<Arc<dyn Service>> = Vec::new();

    if config.dns.enabled == Some(true) {
        services.push(registry.resolve_or_create("dnsService", || {
            Arc::new(outpost_collab::DnsService) as Arc<dyn Service>
        }));
    }
    if config.git.livereload.enabled == Some(true) {
        services.push(registry.resolve_or_create("gitLivereloadService", || {
            Arc::new(outpost_collab::GitLivereloadService) as Arc<dyn Service>
        }));
    }
    if config.aws.localstack.enabled == Some(true) {
        services.push(registry.resolve_or_create("localstackService", || {
            Arc::new(outpost_collab::LocalstackService) as Arc<dyn Service>
        }));
    }
    for (name, registry_cfg) in &config.docker.registries {
        let key = format!("registryService.{name}");
        let name = name.clone();
        let remote = registry_cfg.remote.clone();
        services.push(
            registry
                .resolve_or_create(&key, || {
                    Arc::new(outpost_collab::RegistryService::new(name, remote)) as Arc<dyn Service>
                }),
        );
    }
    if let Some(driver) = config.cluster.driver.as_deref() {
        if driver == "talos" || driver == "omni" {
            let controlplanes = config.cluster.controlplanes.count.unwrap_or(0);
            let workers = config.cluster.workers.count.unwrap_or(0);
            for index in 0..controlplanes {
                let key = format!("clusterNode.controlplane-{index}");
                services.push(registry.resolve_or_create(&key, || {
                    Arc::new(outpost_collab::ClusterNodeService::control_plane(index))
                        as Arc<dyn Service>
                }));
            }
            for index in 0..workers {
                let key = format!("clusterNode.worker-{index}");
                services.push(registry.resolve_or_create(&key, || {
                    Arc::new(outpost_collab::ClusterNodeService::worker(index)) as Arc<dyn Service>
                }));
            }
        }
    }

    services
}

/// **withTerraformResolvers** — empty when terraform is disabled.
pub fn with_terraform_resolvers(
    registry: &Registry,
    config: &Config,
    project_root: &Path,
) -> Vec<Arc<dyn outpost_collab::TerraformResolver>> {
    if config.terraform.enabled != Some(true) {
        return Vec::new();
    }
    let root = project_root.join("terraform");
    vec![
        registry.resolve_or_create("standardTerraformResolver", || {
            Arc::new(outpost_collab::StandardTerraformResolver::new(root.clone()))
                as Arc<dyn outpost_collab::TerraformResolver>
        }),
        registry.resolve_or_create("ociTerraformResolver", || {
            Arc::new(outpost_collab::OciTerraformResolver::new(String::new()))
                as Arc<dyn outpost_collab::TerraformResolver>
        }),
    ]
}

/// The defaults kind selected for a local context (spec.md §4.6 step 3).
pub fn defaults_kind_for(vm_driver: Option<&str>, is_local: bool) -> DefaultsKind {
    if !is_local {
        return DefaultsKind::Plain;
    }
    match vm_driver {
        Some("docker-desktop") => DefaultsKind::Localhost,
        _ => DefaultsKind::Full,
    }
}

/// Default VM driver per spec.md §4.6 step 3: `docker-desktop` on
/// macOS/Windows, `docker` elsewhere.
pub fn default_vm_driver() -> &'static str {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        "docker-desktop"
    } else {
        "docker"
    }
}

/// Collect the merged environment-variable map for the active context:
/// optionally decrypt secrets, then overlay every printer's variables in
/// registration order. This is spec.md §4.4 EnvPipeline steps 3-4, shared
/// verbatim with `ExecPipeline` per §4.5 ("environment populated exactly
/// as EnvPipeline would populate it").
pub async fn collect_environment(
    secrets_providers: &[Arc<dyn SecretsProvider>],
    printers: &[Arc<dyn EnvPrinter>],
    decrypt: bool,
    verbose: bool,
) -> Result<HashMap<String, String>, PipelineError> {
    let mut merged = HashMap::new();

    if decrypt {
        for provider in secrets_providers {
            match provider.load().await {
                Ok(vars) => merged.extend(vars),
                Err(e) if verbose => return Err(PipelineError::SecretsLoad(e.to_string())),
                Err(e) => {
                    tracing::warn!(error = %e, "swallowed secrets-load failure in non-verbose mode");
                }
            }
        }
    }

    for printer in printers {
        merged.extend(printer.print_env());
    }

    Ok(merged)
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
