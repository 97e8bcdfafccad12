// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build IDs of the form `YYMMDD.NNN.C` (see spec.md §4.13).

use rand::Rng;
use thiserror::Error;

/// Errors raised while parsing a persisted build-id string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildIdError {
    #[error("invalid build id: {0}")]
    InvalidFormat(String),
}

/// A parsed/generated build identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildId {
    pub date: String,
    pub random: String,
    pub counter: u32,
}

impl BuildId {
    /// Parse a persisted `YYMMDD.NNN.C` string. Malformed values (not three
    /// dot-separated parts, or a non-integer counter) fail with
    /// `BuildIdError::InvalidFormat`, matching spec.md's `invalid-build-id`.
    pub fn parse(raw: &str) -> Result<Self, BuildIdError> {
        let raw = raw.trim();
        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() != 3 {
            return Err(BuildIdError::InvalidFormat(raw.to_string()));
        }
        let counter: u32 = parts[2]
            .parse()
            .map_err(|_| BuildIdError::InvalidFormat(raw.to_string()))?;
        Ok(BuildId {
            date: parts[0].to_string(),
            random: parts[1].to_string(),
            counter,
        })
    }

    /// Render back to the persisted/displayed form.
    pub fn render(&self) -> String {
        format!("{}.{}.{}", self.date, self.random, self.counter)
    }

    /// Generate the next build id given today's date (`YYMMDD`) and an
    /// optional previously persisted one.
    ///
    /// - No existing id: `today.NNN.1` with a fresh random number.
    /// - Existing id, same date: increment the counter.
    /// - Existing id, different date: reset to `today.NNN.1` with a fresh
    ///   random number.
    pub fn next(today: &str, existing: Option<&BuildId>) -> BuildId {
        match existing {
            Some(prev) if prev.date == today => BuildId {
                date: today.to_string(),
                random: prev.random.clone(),
                counter: prev.counter + 1,
            },
            _ => BuildId {
                date: today.to_string(),
                random: fresh_random(),
                counter: 1,
            },
        }
    }
}

fn fresh_random() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{n:03}")
}

#[cfg(test)]
#[path = "build_id_tests.rs"]
mod tests;
