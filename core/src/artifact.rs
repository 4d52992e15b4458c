//! # Artifact Index
//!
//! The single source of truth for what the pipeline produced. Each
//! stage appends its outcomes here as it completes; the report builder
//! reads only this index and never re-discovers state from the
//! filesystem. Created empty at workspace init, append-only, and only
//! ever touched by the orchestrating task.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// What became of one logical artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The artifact exists at `path`, relative to the workspace root.
    Produced { path: PathBuf },
    /// The producing stage or task failed.
    Failed { reason: String },
    /// The stage ran but had nothing to do (e.g. zero hosts).
    Skipped { reason: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct Entry {
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Append-only map of logical artifact name ("subdomains",
/// "open-ports", "service-scan:10.0.0.1", ...) to outcome, in
/// insertion order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ArtifactIndex {
    entries: Vec<Entry>,
}

impl ArtifactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_produced(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.push(Entry {
            name: name.into(),
            outcome: Outcome::Produced { path: path.into() },
        });
    }

    pub fn record_failed(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.entries.push(Entry {
            name: name.into(),
            outcome: Outcome::Failed {
                reason: reason.into(),
            },
        });
    }

    pub fn record_skipped(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.entries.push(Entry {
            name: name.into(),
            outcome: Outcome::Skipped {
                reason: reason.into(),
            },
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entries whose name starts with `prefix`, e.g. `service-scan:`
    /// for the per-host service enumeration artifacts.
    pub fn with_prefix(&self, prefix: &str) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.name.starts_with(prefix))
            .collect()
    }

    /// Count of entries that actually produced an artifact.
    pub fn produced_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Produced { .. }))
            .count()
    }

    /// Count of entries recorded as failed.
    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Failed { .. }))
            .count()
    }

    /// Persists the index as pretty JSON for post-hoc tooling.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
