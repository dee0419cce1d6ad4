//! Browser preview for Quire
//!
//! The preview is a standalone HTML file in the temp folder, opened in the
//! default browser. It is rewritten whenever the stylesheet, the chapter
//! selection or a centering overlay changes; the optional meta refresh makes
//! the browser pick the new file up on its own.

pub mod document;
pub mod markdown;

pub use document::{preview_path, write_preview, PreviewPage};
pub use markdown::{AssetLinker, FileLinker, RouteLinker};

use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::Path;

/// Open a written preview file in the default browser.
pub fn open_in_browser(path: &Path) -> Result<()> {
    match open::that(path) {
        Ok(()) => {
            debug!("Opened preview {}", path.display());
            Ok(())
        }
        Err(e) => {
            warn!("Failed to open preview {}: {}", path.display(), e);
            Err(Error::Application(format!(
                "Could not open the preview in a browser: {}",
                e
            )))
        }
    }
}
