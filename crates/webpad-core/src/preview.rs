//! Run-in-browser previews.
//!
//! Running a document writes it to a temp `.html` file and hands the
//! path to the system browser. The file is deliberately kept on disk:
//! the browser loads it asynchronously, so deleting it on our side
//! would race the page load. The OS temp cleaner owns it from here.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{CoreError, CoreResult};

/// Writes `html` to a fresh temp file and returns its path.
pub fn write_preview(html: &str) -> CoreResult<PathBuf> {
    write_preview_in(std::env::temp_dir(), html)
}

/// Same as [`write_preview`], with an explicit parent directory.
pub fn write_preview_in(dir: impl AsRef<Path>, html: &str) -> CoreResult<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("webpad-")
        .suffix(".html")
        .tempfile_in(dir)?;
    file.write_all(html.as_bytes())?;
    // keep() disarms the drop guard so the browser finds the file
    let (_, path) = file.keep().map_err(|e| CoreError::Io(e.error))?;
    tracing::info!(path = %path.display(), "wrote preview");
    Ok(path)
}

/// Wraps a script in the smallest HTML page that will execute it.
///
/// The script text goes in verbatim. A `</script>` inside a string
/// literal would end the block early, which matches how an inline
/// script behaves in a hand-written page too.
pub fn javascript_page(script: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Run JavaScript</title>\n\
         </head>\n\
         <body>\n\
         <script>{script}</script>\n\
         </body>\n\
         </html>"
    )
}

/// Opens `path` with the platform's default browser.
pub fn open_in_browser(path: &Path) -> CoreResult<()> {
    open::that(path)?;
    tracing::info!(path = %path.display(), "launched browser");
    Ok(())
}
