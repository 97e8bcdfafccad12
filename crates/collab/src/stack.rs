// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The stack collaborator: brings the local compose/orchestration stack
//! up and down (spec.md §4.3 `withStack`, §4.6 UpPipeline, §4.7 DownPipeline).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StackError {
    #[error("failed to bring stack up: {0}")]
    Up(String),
    #[error("failed to bring stack down: {0}")]
    Down(String),
}

#[async_trait]
pub trait Stack: Send + Sync {
    fn init(&self) -> Result<(), StackError> {
        Ok(())
    }

    async fn up(&self) -> Result<(), StackError>;

    async fn down(&self) -> Result<(), StackError>;
}

/// No-op stack used when a context declares no container-runtime provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpStack;

#[async_trait]
impl Stack for NoOpStack {
    async fn up(&self) -> Result<(), StackError> {
        Ok(())
    }

    async fn down(&self) -> Result<(), StackError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeState {
        up_calls: u32,
        down_calls: u32,
        up_err: Option<String>,
        down_err: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct FakeStack {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeStack {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_up(&self, message: impl Into<String>) {
            self.inner.lock().up_err = Some(message.into());
        }

        pub fn fail_down(&self, message: impl Into<String>) {
            self.inner.lock().down_err = Some(message.into());
        }

        pub fn up_calls(&self) -> u32 {
            self.inner.lock().up_calls
        }

        pub fn down_calls(&self) -> u32 {
            self.inner.lock().down_calls
        }
    }

    #[async_trait]
    impl Stack for FakeStack {
        async fn up(&self) -> Result<(), StackError> {
            let mut state = self.inner.lock();
            state.up_calls += 1;
            if let Some(err) = state.up_err.clone() {
                return Err(StackError::Up(err));
            }
            Ok(())
        }

        async fn down(&self) -> Result<(), StackError> {
            let mut state = self.inner.lock();
            state.down_calls += 1;
            if let Some(err) = state.down_err.clone() {
                return Err(StackError::Down(err));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStack;

#[cfg(test)]
#[path = "stack_tests.rs"]
mod tests;
