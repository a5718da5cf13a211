//! Drives one binding run over a folder:
//! discover → segment → (per group) name → assemble
//!
//! A decode failure aborts the run before anything is written. A failing
//! group is recorded and the run moves on to the next one.

use chrono::Utc;
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::assembler::{Assembler, FileSystem};
use crate::classifier::Classifier;
use crate::decode::LumaDecoder;
use crate::document::DocumentWriter;
use crate::error::PipelineError;
use crate::namer::{Namer, UsedNames};
use crate::report::{GroupReport, RunReport};
use crate::segmenter::segment;
use crate::settings::{DiscoveryOrder, Settings};
use crate::ui::prompt::NamePrompt;

/// List the photos directly inside `base` that match the configured extensions
pub fn discover(base: &Path, settings: &Settings) -> Result<Vec<PathBuf>, PipelineError> {
    let mut photos = Vec::new();

    for entry in WalkDir::new(base).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| PipelineError::Discover {
            path: base.to_path_buf(),
            source,
        })?;

        // Only files, group folders from earlier runs are left alone
        if !entry.file_type().is_file() {
            continue;
        }
        if settings.matches_extension(entry.path()) {
            photos.push(entry.into_path());
        }
    }

    match settings.order {
        DiscoveryOrder::Listing => {}
        DiscoveryOrder::Name => photos.sort_by(|a, b| a.file_name().cmp(&b.file_name())),
        DiscoveryOrder::Modified => {
            photos.sort_by_cached_key(|p| fs::metadata(p).and_then(|m| m.modified()).ok())
        }
    }

    tracing::info!("Found {} photos in {}", photos.len(), base.display());
    Ok(photos)
}

/// Collaborators for one run, consumed by `run`
pub struct Pipeline<'a> {
    settings: &'a Settings,
    decoder: &'a dyn LumaDecoder,
    prompt: &'a mut dyn NamePrompt,
    writer: &'a dyn DocumentWriter,
    fs: &'a dyn FileSystem,
    rng: Box<dyn RngCore + 'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        decoder: &'a dyn LumaDecoder,
        prompt: &'a mut dyn NamePrompt,
        writer: &'a dyn DocumentWriter,
        fs: &'a dyn FileSystem,
        rng: Box<dyn RngCore + 'a>,
    ) -> Self {
        Self {
            settings,
            decoder,
            prompt,
            writer,
            fs,
            rng,
        }
    }

    pub fn run(self, base: &Path) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();

        let photos = discover(base, self.settings)?;
        let classifier = Classifier::new(self.decoder, self.settings.tolerance);
        let groups = segment(&photos, &classifier)?;

        let grouped: usize = groups.iter().map(|g| g.len()).sum();
        let separators = photos.len() - grouped;
        tracing::info!("{} groups, {} separators", groups.len(), separators);

        let mut used = UsedNames::new();
        let mut namer = Namer::new(self.prompt, self.rng, self.settings.default_name.clone());
        let assembler = Assembler::new(self.writer, self.fs);

        let mut reports = Vec::with_capacity(groups.len());
        for (index, group) in groups.into_iter().enumerate() {
            let name = namer.assign_name(&group.photos, &mut used);

            let report = match assembler.assemble(base, &name, &group.photos) {
                Ok(assembled) => {
                    tracing::info!("Group {:02} bound as \"{}\" ({} photos moved)", index, name, assembled.moved);
                    GroupReport::completed(index, name, group.photos, assembled)
                }
                Err(e) => {
                    tracing::error!("Group {:02} \"{}\" failed: {}", index, name, e);
                    GroupReport::failed(index, name, group.photos, &e)
                }
            };
            reports.push(report);
        }

        Ok(RunReport {
            folder: base.to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            photos: photos.len(),
            separators,
            groups: reports,
        })
    }
}
