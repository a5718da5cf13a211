use rfd::FileDialog;
use std::path::PathBuf;

/// Show the native folder picker.
/// Returns `None` when the user cancels.
pub fn pick_photo_folder() -> Option<PathBuf> {
    let folder = FileDialog::new()
        .set_title("Select Folder with Photos to Bind")
        .pick_folder();

    match &folder {
        Some(path) => tracing::info!("Selected folder: {}", path.display()),
        None => tracing::info!("Folder selection cancelled"),
    }

    folder
}
