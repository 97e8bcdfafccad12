// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The parameter bag: an immutable key -> value map carrying one command's
//! inputs and ambient flags through `Initialize` and `Execute`.
//!
//! Typed lookups return a value and an implicit presence flag (`Option`);
//! absent values never panic. Child derivations (`ParamBag::derive`) add
//! keys without mutating the parent, matching spec.md's "non-destructively".

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A value held in the parameter bag.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Str(String),
    Seq(Vec<String>),
    Duration(Duration),
    /// A sink that the bag's owner writes lines of output to (the `output`
    /// key used by check/context). Not `Debug`; boxed so the bag stays
    /// `Clone`.
    Output(Arc<dyn Fn(&str) + Send + Sync>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Seq(s) => write!(f, "Seq({s:?})"),
            Value::Duration(d) => write!(f, "Duration({d:?})"),
            Value::Output(_) => write!(f, "Output(<sink>)"),
        }
    }
}

/// An immutable key -> value map. Cheap to clone: the backing map is
/// reference-counted, so `derive` does not copy existing entries.
#[derive(Clone, Debug, Default)]
pub struct ParamBag {
    entries: Arc<HashMap<String, Value>>,
}

impl ParamBag {
    /// Start building a bag from scratch.
    pub fn builder() -> ParamBagBuilder {
        ParamBagBuilder::default()
    }

    /// Look up a raw value, presence flag included via `Option`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Read a boolean flag. Absent keys read as `false` (every bool key in
    /// the table at spec.md §6 is an "off by default" ambient flag).
    pub fn bool(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Value::Bool(true)))
    }

    /// Read a string value. Returns `None` when absent or of another shape.
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Value::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read a string sequence value.
    pub fn seq(&self, key: &str) -> Option<&[String]> {
        match self.entries.get(key) {
            Some(Value::Seq(s)) => Some(s.as_slice()),
            _ => None,
        }
    }

    /// Read a duration value. Absent reads as `Duration::ZERO` ("no bound"
    /// per spec.md §5 Cancellation and timeouts).
    pub fn duration(&self, key: &str) -> Duration {
        match self.entries.get(key) {
            Some(Value::Duration(d)) => *d,
            _ => Duration::ZERO,
        }
    }

    /// Read an output sink, if one was provided for this key.
    pub fn output(&self, key: &str) -> Option<Arc<dyn Fn(&str) + Send + Sync>> {
        match self.entries.get(key) {
            Some(Value::Output(f)) => Some(Arc::clone(f)),
            _ => None,
        }
    }

    /// Whether the key is present at all, regardless of shape.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Derive a child bag with one additional (or overridden) key. The
    /// parent bag is untouched; this never mutates `self`.
    pub fn derive(&self, key: impl Into<String>, value: Value) -> ParamBag {
        let mut map = (*self.entries).clone();
        map.insert(key.into(), value);
        ParamBag {
            entries: Arc::new(map),
        }
    }
}

/// Builder for `ParamBag`, used by the CLI front end to assemble one
/// command's inputs before handing it to a pipeline.
#[derive(Default)]
pub struct ParamBagBuilder {
    entries: HashMap<String, Value>,
}

impl ParamBagBuilder {
    pub fn bool(mut self, key: impl Into<String>, value: bool) -> Self {
        self.entries.insert(key.into(), Value::Bool(value));
        self
    }

    pub fn str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), Value::Str(value.into()));
        self
    }

    pub fn seq(mut self, key: impl Into<String>, value: Vec<String>) -> Self {
        self.entries.insert(key.into(), Value::Seq(value));
        self
    }

    pub fn duration(mut self, key: impl Into<String>, value: Duration) -> Self {
        self.entries.insert(key.into(), Value::Duration(value));
        self
    }

    pub fn output(
        mut self,
        key: impl Into<String>,
        sink: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.entries
            .insert(key.into(), Value::Output(Arc::new(sink)));
        self
    }

    pub fn build(self) -> ParamBag {
        ParamBag {
            entries: Arc::new(self.entries),
        }
    }
}

#[cfg(test)]
#[path = "bag_tests.rs"]
mod tests;
