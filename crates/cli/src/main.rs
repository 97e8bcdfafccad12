// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! outpost - pipeline orchestration CLI for developer-workstation
//! infrastructure (local VMs, container runtimes, overlay networks,
//! Kubernetes clusters, Terraform-managed resources, and declarative
//! blueprints).

mod color;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outpost_core::ParamBag;
use outpost_pipelines::PipelineFactory;
use outpost_registry::Registry;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "outpost",
    version,
    about = "Provision and manage developer-workstation infrastructure"
)]
struct Cli {
    /// Change to <dir> before doing anything
    #[arg(short = 'C', long = "project-root", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Windsor context to operate in
    #[arg(long = "context", global = true, value_name = "NAME")]
    context: Option<String>,

    /// Surface non-fatal errors instead of swallowing them
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Trust the current directory (adds it to the shell's trusted list)
    #[arg(long, global = true)]
    trust: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize or reconfigure the active context
    Init {
        /// Bypass cached load and rewrite the blueprint
        #[arg(long)]
        reset: bool,
        /// Explicit blueprint OCI reference
        #[arg(long)]
        blueprint: Option<String>,
        /// Hint SaveConfig that flags were explicitly set on this invocation
        #[arg(long)]
        set: bool,
    },
    /// Bring the context's VM, container runtime, networking, and stack up
    Up,
    /// Tear the context's stack, networking, container runtime, and VM down
    Down,
    /// Install the loaded blueprint's kustomizations into the cluster
    Install {
        /// Block until kustomizations report ready
        #[arg(long)]
        wait: bool,
    },
    /// Print or inject the active context's environment variables
    Env {
        /// Inject into the current process only; do not print
        #[arg(long)]
        quiet: bool,
        /// Decrypt and load secrets before collecting variables
        #[arg(long)]
        decrypt: bool,
        /// Invoked from a shell integration hook (suppresses the trust warning)
        #[arg(long)]
        hook: bool,
    },
    /// Run a command with the context's environment populated
    Exec {
        /// Decrypt and load secrets before running
        #[arg(long)]
        decrypt: bool,
        /// Executable to run
        command: String,
        /// Arguments passed to the executable
        args: Vec<String>,
    },
    /// Check tool versions or cluster/node health
    Check {
        #[command(subcommand)]
        command: CheckCommand,
    },
    /// Bundle or push deployment artifacts
    Artifact {
        #[command(subcommand)]
        command: ArtifactCommand,
    },
    /// Install the shell integration hook
    Hook {
        /// Shell to install the hook for (bash, zsh, fish, ...)
        shell_type: String,
    },
    /// Print the current or a freshly generated build ID
    BuildId {
        /// Force regeneration even if a build ID already exists
        #[arg(long)]
        new: bool,
    },
    /// Get or set the active Windsor context
    Context {
        #[command(subcommand)]
        command: ContextCommand,
    },
}

#[derive(Subcommand)]
enum CheckCommand {
    /// Verify required tools are installed and up to date
    Tools,
    /// Wait for nodes and/or the Kubernetes API to report healthy
    NodeHealth {
        /// Node addresses to probe
        #[arg(long = "node")]
        nodes: Vec<String>,
        /// Expected node version
        #[arg(long)]
        version: Option<String>,
        /// Kubernetes API endpoint override; omit to skip the Kubernetes check
        #[arg(long = "k8s-endpoint")]
        k8s_endpoint: Option<String>,
        /// Health-probe bound in seconds (0 = no bound)
        #[arg(long, default_value_t = 0)]
        timeout: u64,
    },
}

#[derive(Subcommand)]
enum ArtifactCommand {
    /// Write the bundled artifact to a local path
    Bundle {
        /// Destination path for the bundle
        #[arg(long)]
        output_path: String,
        /// Optional tag recorded with the bundle
        #[arg(long)]
        tag: Option<String>,
    },
    /// Push the bundled artifact to an OCI registry
    Push {
        /// Registry base (e.g. `ghcr.io/acme`)
        #[arg(long)]
        registry_base: String,
        /// Repository name under the registry base
        #[arg(long)]
        repo_name: String,
        /// Optional tag
        #[arg(long)]
        tag: Option<String>,
    },
}

#[derive(Subcommand)]
enum ContextCommand {
    /// Print the active context name
    Get,
    /// Set the active context, creating it if necessary
    Set {
        /// Context name to select
        name: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{}", color::red(&format!("Error: {err:#}")));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(ref dir) = cli.directory {
        let canonical = std::fs::canonicalize(dir)
            .with_context(|| format!("cannot change to directory '{}'", dir.display()))?;
        std::env::set_current_dir(&canonical)
            .with_context(|| format!("cannot change to directory '{}'", canonical.display()))?;
    }

    let project_root = find_project_root();
    let registry = Registry::new();
    let bag = build_bag(&cli);

    let pipeline_name = pipeline_name_for(&cli.command);
    let pipeline = PipelineFactory::get(pipeline_name, &registry, &project_root, &bag)?;
    pipeline.execute(&bag).await?;

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("outpost={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn pipeline_name_for(command: &Commands) -> &'static str {
    match command {
        Commands::Init { .. } => "initPipeline",
        Commands::Up => "upPipeline",
        Commands::Down => "downPipeline",
        Commands::Install { .. } => "installPipeline",
        Commands::Env { .. } => "envPipeline",
        Commands::Exec { .. } => "execPipeline",
        Commands::Check { .. } => "checkPipeline",
        Commands::Artifact { .. } => "artifactPipeline",
        Commands::Hook { .. } => "hookPipeline",
        Commands::BuildId { .. } => "buildIDPipeline",
        Commands::Context { .. } => "contextPipeline",
    }
}

/// Assemble the parameter bag for one command invocation, per spec.md §6's
/// bag-key table. Global flags (`verbose`, `trust`, `contextName`) are
/// applied to every bag regardless of command.
fn build_bag(cli: &Cli) -> ParamBag {
    let mut builder = ParamBag::builder()
        .bool("verbose", cli.verbose)
        .bool("trust", cli.trust);
    if let Some(ref context) = cli.context {
        builder = builder.str("contextName", context.clone());
    }

    match &cli.command {
        Commands::Init {
            reset,
            blueprint,
            set,
        } => {
            builder = builder
                .bool("initPipeline", true)
                .bool("reset", *reset)
                .bool("hasSetFlags", *set);
            if let Some(blueprint) = blueprint {
                builder = builder.str("blueprint", blueprint.clone());
            }
        }
        Commands::Up | Commands::Down => {}
        Commands::Install { wait } => {
            builder = builder.bool("wait", *wait);
        }
        Commands::Env {
            quiet,
            decrypt,
            hook,
        } => {
            builder = builder
                .bool("quiet", *quiet)
                .bool("decrypt", *decrypt)
                .bool("hook", *hook);
        }
        Commands::Exec {
            decrypt,
            command,
            args,
        } => {
            builder = builder
                .bool("decrypt", *decrypt)
                .str("command", command.clone())
                .seq("args", args.clone());
        }
        Commands::Check { command } => match command {
            CheckCommand::Tools => {
                builder = builder.str("operation", "tools");
            }
            CheckCommand::NodeHealth {
                nodes,
                version,
                k8s_endpoint,
                timeout,
            } => {
                builder = builder
                    .str("operation", "node-health")
                    .seq("nodes", nodes.clone())
                    .bool("k8s-endpoint-provided", k8s_endpoint.is_some())
                    .duration("timeout", Duration::from_secs(*timeout));
                if let Some(version) = version {
                    builder = builder.str("version", version.clone());
                }
                if let Some(endpoint) = k8s_endpoint {
                    builder = builder.str("k8s-endpoint", endpoint.clone());
                }
            }
        },
        Commands::Artifact { command } => match command {
            ArtifactCommand::Bundle { output_path, tag } => {
                builder = builder
                    .str("artifactMode", "bundle")
                    .str("outputPath", output_path.clone());
                if let Some(tag) = tag {
                    builder = builder.str("tag", tag.clone());
                }
            }
            ArtifactCommand::Push {
                registry_base,
                repo_name,
                tag,
            } => {
                builder = builder
                    .str("artifactMode", "push")
                    .str("registryBase", registry_base.clone())
                    .str("repoName", repo_name.clone());
                if let Some(tag) = tag {
                    builder = builder.str("tag", tag.clone());
                }
            }
        },
        Commands::Hook { shell_type } => {
            builder = builder.str("shellType", shell_type.clone());
        }
        Commands::BuildId { new } => {
            builder = builder.bool("new", *new);
        }
        Commands::Context { command } => match command {
            ContextCommand::Get => {
                builder = builder
                    .str("operation", "get")
                    .output("output", |line: &str| println!("{line}"));
            }
            ContextCommand::Set { name } => {
                builder = builder
                    .str("operation", "set")
                    .str("contextName", name.clone())
                    .output("output", |line: &str| println!("{line}"));
            }
        },
    }

    builder.build()
}

/// Find the project root by walking up from the current directory looking
/// for a `.windsor` directory (spec.md §6 Persisted State: the build-ID and
/// reset-token files live under `<project-root>/.windsor`).
fn find_project_root() -> PathBuf {
    let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_project_root_from(start)
}

fn find_project_root_from(start: PathBuf) -> PathBuf {
    let mut current = start.clone();
    loop {
        if current.join(".windsor").is_dir()
            || current.join("windsor.yaml").is_file()
            || current.join("windsor.yml").is_file()
        {
            return current;
        }
        if !current.pop() {
            return start;
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
