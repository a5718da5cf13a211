//! Splits an ordered photo sequence into groups at separator photos

use std::path::PathBuf;

use crate::classifier::Classifier;
use crate::error::DecodeError;

/// A maximal run of content photos, in sequence order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub photos: Vec<PathBuf>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.photos.len()
    }
}

/// Segment photos in a single forward pass.
///
/// Leading, trailing and consecutive separators never produce empty groups.
/// The first decode failure aborts segmentation and nothing is returned.
pub fn segment(photos: &[PathBuf], classifier: &Classifier) -> Result<Vec<Group>, DecodeError> {
    segment_by(photos, |photo| classifier.is_separator(photo))
}

/// Segment with an arbitrary separator test
pub fn segment_by<F>(photos: &[PathBuf], mut is_separator: F) -> Result<Vec<Group>, DecodeError>
where
    F: FnMut(&PathBuf) -> Result<bool, DecodeError>,
{
    let mut groups = Vec::new();
    let mut current: Vec<PathBuf> = Vec::new();

    for photo in photos {
        if is_separator(photo)? {
            // Close the running group only if it holds something
            if !current.is_empty() {
                groups.push(Group {
                    photos: std::mem::take(&mut current),
                });
            }
        } else {
            current.push(photo.clone());
        }
    }

    if !current.is_empty() {
        groups.push(Group { photos: current });
    }

    for (i, group) in groups.iter().enumerate() {
        tracing::info!("Group {:02}: {} photos", i, group.len());
    }

    Ok(groups)
}
