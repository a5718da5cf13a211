//! Per-run summary of what happened to every group

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::assembler::Assembled;
use crate::error::AssembleError;

/// What happened to one group
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// Document written and every photo moved
    Completed,
    /// Nothing written or moved
    DocumentFailed { message: String },
    /// Document written, but the photos are still in the base folder
    DirectoryFailed { message: String },
    /// Document written and folder created, some photos could not be moved
    PartiallyMoved {
        moved: usize,
        failed: Vec<PathBuf>,
        message: String,
    },
}

impl GroupOutcome {
    pub fn from_error(error: &AssembleError) -> Self {
        let message = error.to_string();
        match error {
            AssembleError::Document(_) => Self::DocumentFailed { message },
            AssembleError::DirectoryCreate { .. } => Self::DirectoryFailed { message },
            AssembleError::PartialMove { moved, failures, .. } => Self::PartiallyMoved {
                moved: *moved,
                failed: failures.iter().map(|f| f.photo.clone()).collect(),
                message,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub index: usize,
    pub name: String,
    pub photos: Vec<PathBuf>,
    pub document: Option<PathBuf>,
    pub folder: Option<PathBuf>,
    pub outcome: GroupOutcome,
}

impl GroupReport {
    pub fn completed(index: usize, name: String, photos: Vec<PathBuf>, assembled: Assembled) -> Self {
        Self {
            index,
            name,
            photos,
            document: Some(assembled.document),
            folder: Some(assembled.folder),
            outcome: GroupOutcome::Completed,
        }
    }

    pub fn failed(index: usize, name: String, photos: Vec<PathBuf>, error: &AssembleError) -> Self {
        let (document, folder) = match error {
            AssembleError::Document(_) => (None, None),
            AssembleError::DirectoryCreate { document, .. } => (Some(document.clone()), None),
            AssembleError::PartialMove { folder, document, .. } => {
                (Some(document.clone()), Some(folder.clone()))
            }
        };

        Self {
            index,
            name,
            photos,
            document,
            folder,
            outcome: GroupOutcome::from_error(error),
        }
    }

    /// One human-readable summary line
    pub fn summary_line(&self) -> String {
        match &self.outcome {
            GroupOutcome::Completed => {
                format!("✅ {:02} {}: {} photos bound", self.index, self.name, self.photos.len())
            }
            GroupOutcome::DocumentFailed { message } => {
                format!("❌ {:02} {}: nothing written or moved ({})", self.index, self.name, message)
            }
            GroupOutcome::DirectoryFailed { message } => format!(
                "⚠️  {:02} {}: document written but {} photos left ungrouped in the folder ({})",
                self.index,
                self.name,
                self.photos.len(),
                message
            ),
            GroupOutcome::PartiallyMoved { moved, failed, .. } => {
                let names: Vec<String> = failed.iter().map(|p| p.display().to_string()).collect();
                format!(
                    "⚠️  {:02} {}: moved {} of {} photos, not moved: {}",
                    self.index,
                    self.name,
                    moved,
                    self.photos.len(),
                    names.join(", ")
                )
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub folder: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Photos discovered in the folder
    pub photos: usize,
    pub separators: usize,
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    pub fn failed_groups(&self) -> usize {
        self.groups.iter().filter(|g| !g.outcome.is_success()).count()
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "📊 {}: {} photos, {} separators, {} groups ({} failed)",
            self.folder.display(),
            self.photos,
            self.separators,
            self.groups.len(),
            self.failed_groups()
        )];
        lines.extend(self.groups.iter().map(GroupReport::summary_line));
        lines.join("\n")
    }

    /// Get the directory run reports are saved to
    /// Returns ~/.local/share/photo-binder/reports on Linux
    pub fn default_dir() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_default();

        path.push("photo-binder");
        path.push("reports");
        path
    }

    /// Write the report as JSON into `dir`, named after the run's start time
    pub fn save(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("run-{}.json", self.started_at.format("%Y%m%d-%H%M%S")));
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&path, json)?;

        Ok(path)
    }
}
