//! Word document output for a group
//!
//! The document holds the group's name as a title followed by every photo,
//! in group order, at a fixed display width.

use docx_rs::{Docx, Paragraph, Pic, Run, Style, StyleType};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::decode::{raw, PhotoDecoder};
use crate::error::DocumentError;

/// English Metric Units per inch, the unit docx uses for drawing sizes
const EMU_PER_INCH: f64 = 914_400.0;

/// Capability: persist a titled document embedding the given photos
pub trait DocumentWriter {
    /// Write the document into `dir` and return its path
    fn write(&self, dir: &Path, title: &str, photos: &[PathBuf]) -> Result<PathBuf, DocumentError>;
}

#[derive(Debug, Clone)]
pub struct DocxWriter {
    width_inches: f64,
    captions: bool,
}

impl DocxWriter {
    pub fn new(width_inches: f64, captions: bool) -> Self {
        Self {
            width_inches,
            captions,
        }
    }

    /// Path the document for `title` is written to
    pub fn document_path(dir: &Path, title: &str) -> PathBuf {
        dir.join(format!("{}.docx", title))
    }

    /// Drawing size in EMU, keeping the photo's aspect ratio at the fixed width
    fn display_size(&self, width_px: u32, height_px: u32) -> (u32, u32) {
        let width_emu = self.width_inches * EMU_PER_INCH;
        let height_emu = if width_px == 0 {
            0.0
        } else {
            width_emu * f64::from(height_px) / f64::from(width_px)
        };
        (width_emu.round() as u32, height_emu.round() as u32)
    }

    /// Image bytes to embed and their pixel size.
    /// RAW files are embedded through their JPEG preview.
    fn picture_data(photo: &Path) -> Result<(Vec<u8>, u32, u32), DocumentError> {
        if PhotoDecoder::is_raw(photo) {
            let preview = raw::load_preview(photo).map_err(DocumentError::RawPreview)?;
            return Ok((preview.jpeg, preview.width, preview.height));
        }

        let bytes = fs::read(photo).map_err(|source| DocumentError::ReadPhoto {
            path: photo.to_path_buf(),
            source,
        })?;
        let (width_px, height_px) =
            image::image_dimensions(photo).map_err(|source| DocumentError::Dimensions {
                path: photo.to_path_buf(),
                source,
            })?;

        Ok((bytes, width_px, height_px))
    }

    fn picture_paragraph(&self, photo: &Path) -> Result<Paragraph, DocumentError> {
        let (bytes, width_px, height_px) = Self::picture_data(photo)?;
        let (width_emu, height_emu) = self.display_size(width_px, height_px);
        let pic = Pic::new(&bytes).size(width_emu, height_emu);

        Ok(Paragraph::new().add_run(Run::new().add_image(pic)))
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new(5.5, false)
    }
}

impl DocumentWriter for DocxWriter {
    fn write(&self, dir: &Path, title: &str, photos: &[PathBuf]) -> Result<PathBuf, DocumentError> {
        let path = Self::document_path(dir, title);

        let title_style = Style::new("Title", StyleType::Paragraph)
            .name("Title")
            .size(56)
            .bold();

        let mut docx = Docx::new().add_style(title_style).add_paragraph(
            Paragraph::new()
                .style("Title")
                .add_run(Run::new().add_text(title)),
        );

        // Photos are read from their original location, before anything is moved
        for photo in photos {
            docx = docx.add_paragraph(self.picture_paragraph(photo)?);

            if self.captions {
                let caption = photo
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(caption).italic()));
            }
        }

        // Never replace an existing document, e.g. one left by an earlier run
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| DocumentError::Create {
                path: path.clone(),
                source,
            })?;
        docx.build().pack(file).map_err(|e| DocumentError::Pack {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::info!("Wrote document {} ({} photos)", path.display(), photos.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_display_size_keeps_aspect_ratio() {
        let writer = DocxWriter::default();

        let (w, h) = writer.display_size(4000, 3000);
        assert_eq!(w, 5_029_200);
        assert_eq!(h, 3_771_900);

        let (w, h) = writer.display_size(1000, 2000);
        assert_eq!(w, 5_029_200);
        assert_eq!(h, 10_058_400);
    }

    #[test]
    fn test_document_path_uses_title() {
        let path = DocxWriter::document_path(Path::new("/photos"), "Trip_A");
        assert_eq!(path, PathBuf::from("/photos/Trip_A.docx"));
    }

    #[test]
    fn test_writes_docx_file() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("p1.png");
        RgbImage::from_pixel(8, 6, Rgb([200, 120, 40])).save(&photo).unwrap();

        let path = DocxWriter::new(5.5, true)
            .write(dir.path(), "Holiday", &[photo])
            .unwrap();

        assert_eq!(path, dir.path().join("Holiday.docx"));
        let bytes = fs::read(&path).unwrap();
        // docx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_existing_document_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("p1.png");
        RgbImage::from_pixel(8, 6, Rgb([200, 120, 40])).save(&photo).unwrap();
        let existing = dir.path().join("Holiday.docx");
        fs::write(&existing, b"earlier document").unwrap();

        let result = DocxWriter::default().write(dir.path(), "Holiday", &[photo]);

        match result {
            Err(DocumentError::Create { path, source }) => {
                assert_eq!(path, existing);
                assert_eq!(source.kind(), std::io::ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fs::read(&existing).unwrap(), b"earlier document");
    }

    #[test]
    fn test_raw_photo_is_embedded_through_preview() {
        let dir = tempfile::tempdir().unwrap();

        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([90, 160, 220])))
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        let mut raw_file = b"MM\0* camera header".to_vec();
        raw_file.extend(jpeg);
        raw_file.extend(b"sensor data");
        let photo = dir.path().join("DSC_0001.NEF");
        fs::write(&photo, raw_file).unwrap();

        let path = DocxWriter::default()
            .write(dir.path(), "Studio", &[photo])
            .unwrap();

        assert!(fs::read(path).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_unreadable_raw_photo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("DSC_0002.nef");

        let result = DocxWriter::default().write(dir.path(), "Studio", &[missing]);

        assert!(matches!(result, Err(DocumentError::RawPreview(_))));
        assert!(!dir.path().join("Studio.docx").exists());
    }

    #[test]
    fn test_missing_photo_fails_without_creating_document() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.jpg");

        let result = DocxWriter::default().write(dir.path(), "Holiday", &[missing]);

        assert!(matches!(result, Err(DocumentError::ReadPhoto { .. })));
        assert!(!dir.path().join("Holiday.docx").exists());
    }
}
