//! Native file dialog integration using the rfd crate

use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Open a folder picker for a book project.
///
/// Returns `None` if the user cancelled; that is not an error.
pub fn pick_project_folder(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Open Book Project");

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_folder()
}

/// Open a file picker for the Pandoc executable.
pub fn pick_compiler_executable(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Locate Pandoc");

    if cfg!(windows) {
        dialog = dialog
            .add_filter("Programs", &["exe"])
            .add_filter("All Files", &["*"]);
    }

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}
