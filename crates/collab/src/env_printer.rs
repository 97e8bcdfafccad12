// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-variable printers (spec.md §4.3 `withEnvPrinters`, §4.4
//! EnvPipeline): each printer contributes a `key -> value` map for one
//! provider surface; `EnvPipeline` merges them in registration order with
//! later printers overriding earlier ones, then asks the shell to print
//! the merged map.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvPrinterError {
    #[error("post-env hook for {0} failed: {1}")]
    PostEnvHook(String, String),
}

pub trait EnvPrinter: Send + Sync {
    fn init(&self) -> Result<(), EnvPrinterError> {
        Ok(())
    }

    /// Identifies this printer for logging and registry key suffixes
    /// (`aws`, `azure`, `docker`, `cluster`, `terraform`, `windsor`, ...).
    fn name(&self) -> &'static str;

    /// The variables this printer contributes.
    fn print_env(&self) -> HashMap<String, String>;

    /// Run after the merged map has been printed; most printers no-op.
    fn post_env_hook(&self) -> Result<(), EnvPrinterError> {
        Ok(())
    }
}

/// A printer whose variables are fixed at construction — sufficient for
/// the `aws`, `azure`, `docker`, `cluster`, and `terraform` printers,
/// whose variables come straight out of typed config rather than a live
/// provider SDK.
pub struct StaticEnvPrinter {
    name: &'static str,
    vars: HashMap<String, String>,
}

impl StaticEnvPrinter {
    pub fn new(name: &'static str, vars: HashMap<String, String>) -> Self {
        Self { name, vars }
    }

    pub fn aws(region: Option<&str>) -> Self {
        let mut vars = HashMap::new();
        if let Some(region) = region {
            vars.insert("AWS_REGION".to_string(), region.to_string());
        }
        Self::new("aws", vars)
    }

    pub fn azure(subscription_id: Option<&str>) -> Self {
        let mut vars = HashMap::new();
        if let Some(id) = subscription_id {
            vars.insert("AZURE_SUBSCRIPTION_ID".to_string(), id.to_string());
        }
        Self::new("azure", vars)
    }

    pub fn docker(host: Option<&str>) -> Self {
        let mut vars = HashMap::new();
        if let Some(host) = host {
            vars.insert("DOCKER_HOST".to_string(), host.to_string());
        }
        Self::new("docker", vars)
    }

    pub fn cluster(driver: &str) -> Self {
        let mut vars = HashMap::new();
        vars.insert("WINDSOR_CLUSTER_DRIVER".to_string(), driver.to_string());
        Self::new("cluster", vars)
    }

    pub fn terraform(module_dir: Option<&str>) -> Self {
        let mut vars = HashMap::new();
        if let Some(dir) = module_dir {
            vars.insert("TF_DATA_DIR".to_string(), dir.to_string());
        }
        Self::new("terraform", vars)
    }

    /// The cluster-driver-specific printer added when
    /// `cluster.driver ∈ {talos, omni}`.
    pub fn cluster_driver(driver: &str, endpoint: Option<&str>) -> Self {
        let mut vars = HashMap::new();
        if let Some(endpoint) = endpoint {
            let key = format!("{}_ENDPOINT", driver.to_uppercase());
            vars.insert(key, endpoint.to_string());
        }
        Self::new("cluster-driver", vars)
    }

    /// Always appended last: the base tool's own context/session vars.
    pub fn windsor(context_name: &str) -> Self {
        let mut vars = HashMap::new();
        vars.insert("WINDSOR_CONTEXT".to_string(), context_name.to_string());
        Self::new("windsor", vars)
    }
}

impl EnvPrinter for StaticEnvPrinter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn print_env(&self) -> HashMap<String, String> {
        self.vars.clone()
    }
}

/// Merge printers in registration order; later printers win key
/// collisions, per spec.md §7 ordering guarantees.
pub fn merge_printers(printers: &[Box<dyn EnvPrinter>]) -> HashMap<String, String> {
    let mut merged = HashMap::new();
    for printer in printers {
        merged.extend(printer.print_env());
    }
    merged
}

#[cfg(test)]
#[path = "env_printer_tests.rs"]
mod tests;
