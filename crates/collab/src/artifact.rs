// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The artifact builder and its bundlers (spec.md §4.11 ArtifactPipeline):
//! bundlers accumulate files into the builder, which then either writes a
//! local bundle or pushes it to an OCI registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("missing-output-path")]
    MissingOutputPath,
    #[error("bundle creation failed: {0}")]
    Create(String),
    #[error("push failed: {0}")]
    Push(String),
}

/// Contract shared by the template, kustomize, and terraform bundlers.
pub trait Bundler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Add this bundler's files into `builder`.
    fn bundle(&self, builder: &dyn ArtifactBuilder) -> Result<(), ArtifactError>;
}

pub trait ArtifactBuilder: Send + Sync {
    fn init(&self) -> Result<(), ArtifactError> {
        Ok(())
    }

    /// Accumulate `path -> contents` into the pending bundle.
    fn add_file(&self, path: &str, contents: Vec<u8>) -> Result<(), ArtifactError>;

    /// Write the accumulated files as a tar to `output_path`, optionally
    /// tagged.
    fn create(&self, output_path: &Path, tag: Option<&str>) -> Result<(), ArtifactError>;

    /// Push the accumulated files as an OCI artifact to
    /// `registry_base/repo_name[:tag]`.
    fn push(&self, registry_base: &str, repo_name: &str, tag: Option<&str>) -> Result<(), ArtifactError>;

    /// Fetch the bytes of an OCI-referenced artifact (spec.md §4.3
    /// `prepareTemplateData`, §4.6 Init Execute step 3 "pull OCI sources").
    fn fetch(&self, oci_url: &str) -> Result<Vec<u8>, ArtifactError> {
        let _ = oci_url;
        Ok(Vec::new())
    }
}

/// In-memory accumulator; `create` writes a flat concatenation rather than
/// a real tar, since no real archiver collaborator is wired yet.
pub struct NoOpArtifactBuilder {
    files: parking_lot::Mutex<HashMap<String, Vec<u8>>>,
}

impl NoOpArtifactBuilder {
    pub fn new() -> Self {
        Self {
            files: parking_lot::Mutex::new(HashMap::new()),
        }
    }
}

impl Default for NoOpArtifactBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactBuilder for NoOpArtifactBuilder {
    fn add_file(&self, path: &str, contents: Vec<u8>) -> Result<(), ArtifactError> {
        self.files.lock().insert(path.to_string(), contents);
        Ok(())
    }

    fn create(&self, output_path: &Path, _tag: Option<&str>) -> Result<(), ArtifactError> {
        let files = self.files.lock();
        let mut buf = Vec::new();
        let mut names: Vec<&String> = files.keys().collect();
        names.sort();
        for name in names {
            buf.extend_from_slice(name.as_bytes());
            buf.push(0);
            buf.extend_from_slice(&files[name]);
        }
        std::fs::write(output_path, buf).map_err(|e| ArtifactError::Create(e.to_string()))
    }

    fn push(&self, registry_base: &str, repo_name: &str, _tag: Option<&str>) -> Result<(), ArtifactError> {
        if registry_base.is_empty() || repo_name.is_empty() {
            return Err(ArtifactError::Push("missing registry destination".to_string()));
        }
        Ok(())
    }
}

macro_rules! file_bundler {
    ($ident:ident, $name:literal, $path:literal, $contents:literal) => {
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $ident;

        impl Bundler for $ident {
            fn name(&self) -> &'static str {
                $name
            }

            fn bundle(&self, builder: &dyn ArtifactBuilder) -> Result<(), ArtifactError> {
                builder.add_file($path, $contents.to_vec())
            }
        }
    };
}

file_bundler!(TemplateBundler, "template", "templates/context.yaml", b"");
file_bundler!(KustomizeBundler, "kustomize", "kustomize/kustomization.yaml", b"");
file_bundler!(TerraformBundler, "terraform", "terraform/main.tf", b"");

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum ArtifactCall {
        Create { output_path: PathBuf, tag: Option<String> },
        Push { registry_base: String, repo_name: String, tag: Option<String> },
    }

    #[derive(Default)]
    struct FakeState {
        files: HashMap<String, Vec<u8>>,
        calls: Vec<ArtifactCall>,
        create_err: Option<String>,
        push_err: Option<String>,
        fetch_responses: HashMap<String, Vec<u8>>,
        fetch_calls: Vec<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeArtifactBuilder {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeArtifactBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_create(&self, message: impl Into<String>) {
            self.inner.lock().create_err = Some(message.into());
        }

        pub fn fail_push(&self, message: impl Into<String>) {
            self.inner.lock().push_err = Some(message.into());
        }

        pub fn calls(&self) -> Vec<ArtifactCall> {
            self.inner.lock().calls.clone()
        }

        pub fn files(&self) -> HashMap<String, Vec<u8>> {
            self.inner.lock().files.clone()
        }

        pub fn set_fetch_response(&self, oci_url: impl Into<String>, bytes: Vec<u8>) {
            self.inner.lock().fetch_responses.insert(oci_url.into(), bytes);
        }

        pub fn fetch_calls(&self) -> Vec<String> {
            self.inner.lock().fetch_calls.clone()
        }
    }

    impl ArtifactBuilder for FakeArtifactBuilder {
        fn add_file(&self, path: &str, contents: Vec<u8>) -> Result<(), ArtifactError> {
            self.inner.lock().files.insert(path.to_string(), contents);
            Ok(())
        }

        fn create(&self, output_path: &Path, tag: Option<&str>) -> Result<(), ArtifactError> {
            let mut state = self.inner.lock();
            state.calls.push(ArtifactCall::Create {
                output_path: output_path.to_path_buf(),
                tag: tag.map(str::to_string),
            });
            if let Some(err) = state.create_err.clone() {
                return Err(ArtifactError::Create(err));
            }
            Ok(())
        }

        fn push(&self, registry_base: &str, repo_name: &str, tag: Option<&str>) -> Result<(), ArtifactError> {
            let mut state = self.inner.lock();
            state.calls.push(ArtifactCall::Push {
                registry_base: registry_base.to_string(),
                repo_name: repo_name.to_string(),
                tag: tag.map(str::to_string),
            });
            if let Some(err) = state.push_err.clone() {
                return Err(ArtifactError::Push(err));
            }
            Ok(())
        }

        fn fetch(&self, oci_url: &str) -> Result<Vec<u8>, ArtifactError> {
            let mut state = self.inner.lock();
            state.fetch_calls.push(oci_url.to_string());
            Ok(state.fetch_responses.get(oci_url).cloned().unwrap_or_default())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ArtifactCall, FakeArtifactBuilder};

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
