//! Group naming
//!
//! Candidate names come from a prompt, are reduced to characters that are
//! safe in file and folder names, and are made unique within one run.

use rand::{Rng, RngCore};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::PromptError;
use crate::ui::prompt::NamePrompt;

/// Keep letters, digits, spaces, dots and underscores, then trim spaces and dots from both ends
pub fn sanitize(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_'))
        .collect();

    kept.trim_matches(|c| c == ' ' || c == '.').to_string()
}

/// Every name handed out so far in this run
#[derive(Debug, Default, Clone)]
pub struct UsedNames {
    names: HashSet<String>,
}

impl UsedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: String) {
        self.names.insert(name);
    }
}

pub struct Namer<'a> {
    prompt: &'a mut dyn NamePrompt,
    rng: Box<dyn RngCore + 'a>,
    default_name: String,
}

impl<'a> Namer<'a> {
    pub fn new(prompt: &'a mut dyn NamePrompt, rng: Box<dyn RngCore + 'a>, default_name: String) -> Self {
        Self {
            prompt,
            rng,
            default_name,
        }
    }

    /// Ask for a name for the group and record the final choice in `used`.
    ///
    /// A cancelled or failed prompt falls back to the default name. A name
    /// already in use gets one random `_A`..`_Z` suffix; the suffixed name
    /// is not checked again.
    pub fn assign_name(&mut self, photos: &[PathBuf], used: &mut UsedNames) -> String {
        let raw = match self.prompt.prompt(photos) {
            Ok(raw) => raw,
            Err(PromptError::Cancelled) => {
                tracing::warn!("Naming cancelled, using \"{}\"", self.default_name);
                String::new()
            }
            Err(e) => {
                tracing::warn!("{}, using \"{}\"", e, self.default_name);
                String::new()
            }
        };

        let mut name = sanitize(&raw);
        if name.is_empty() {
            name = self.default_name.clone();
        }

        if used.contains(&name) {
            let suffix = self.rng.gen_range(b'A'..=b'Z') as char;
            let suffixed = format!("{}_{}", name, suffix);
            tracing::warn!("Name \"{}\" already used, renaming to \"{}\"", name, suffixed);
            name = suffixed;
        }

        used.insert(name.clone());
        name
    }
}
