//! Turns a named group into its outputs: one document, then one folder
//! holding the group's photos.
//!
//! Order matters. The document is written first because it reads the
//! photos from their original paths. The folder must exist before any
//! photo is moved. Moves that fail are reported and already-moved photos
//! stay where they are.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::document::DocumentWriter;
use crate::error::{AssembleError, MoveFailure};

/// Capability: filesystem primitives used while relocating a group
pub trait FileSystem {
    /// Create a single directory, failing if it already exists
    fn create_dir(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Paths produced for a fully assembled group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub document: PathBuf,
    pub folder: PathBuf,
    pub moved: usize,
}

pub struct Assembler<'a> {
    writer: &'a dyn DocumentWriter,
    fs: &'a dyn FileSystem,
}

impl<'a> Assembler<'a> {
    pub fn new(writer: &'a dyn DocumentWriter, fs: &'a dyn FileSystem) -> Self {
        Self { writer, fs }
    }

    pub fn assemble(&self, base: &Path, name: &str, photos: &[PathBuf]) -> Result<Assembled, AssembleError> {
        let document = self.writer.write(base, name, photos)?;

        let folder = base.join(name);
        self.fs
            .create_dir(&folder)
            .map_err(|source| AssembleError::DirectoryCreate {
                path: folder.clone(),
                document: document.clone(),
                source,
            })?;

        let mut moved = 0;
        let mut failures = Vec::new();

        for photo in photos {
            let Some(file_name) = photo.file_name() else {
                failures.push(MoveFailure {
                    photo: photo.clone(),
                    target: folder.clone(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
                });
                continue;
            };

            let target = folder.join(file_name);
            match self.fs.rename(photo, &target) {
                Ok(()) => moved += 1,
                Err(source) => {
                    tracing::error!("Failed to move {} to {}: {}", photo.display(), target.display(), source);
                    failures.push(MoveFailure {
                        photo: photo.clone(),
                        target,
                        source,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(AssembleError::PartialMove {
                folder,
                document,
                moved,
                failures,
            });
        }

        tracing::info!("Moved {} photos into {}", moved, folder.display());
        Ok(Assembled {
            document,
            folder,
            moved,
        })
    }
}
