//! Handing a rendered invoice to the host's print facility.
//!
//! The document is written to a throwaway HTML file (the print surface) that
//! asks the browser to print once it has loaded. The surface is removed when
//! it goes out of scope, whether printing went through or not.

use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tempfile::NamedTempFile;

use crate::error::{InvoiceError, Result};

/// Opens the document once loaded, prints it, and closes the window afterwards
const PRINT_HOOK: &str = r#"<script>
  window.addEventListener("load", function () {
    setTimeout(function () { window.focus(); window.print(); }, 100);
  });
  window.addEventListener("afterprint", function () { window.close(); });
</script>
"#;

/// Something that can display a document file and start printing it
pub trait PrintHost {
    fn present(&self, document: &Path) -> Result<()>;
}

/// Opens the document with the platform's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl PrintHost for SystemBrowser {
    fn present(&self, document: &Path) -> Result<()> {
        let mut command = opener(document)?;
        tracing::info!(path = %document.display(), "opening invoice for printing");
        command
            .spawn()
            .map_err(|e| InvoiceError::PrintHost(format!("could not launch browser: {e}")))?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener(document: &Path) -> Result<Command> {
    let mut command = Command::new("open");
    command.arg(document);
    Ok(command)
}

#[cfg(target_os = "linux")]
fn opener(document: &Path) -> Result<Command> {
    let mut command = Command::new("xdg-open");
    command.arg(document);
    Ok(command)
}

#[cfg(target_os = "windows")]
fn opener(document: &Path) -> Result<Command> {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(document);
    Ok(command)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn opener(_document: &Path) -> Result<Command> {
    Err(InvoiceError::PrintHost(
        "no known way to open a browser on this platform".to_string(),
    ))
}

/// Ephemeral HTML file holding one document; deleted on drop
pub struct PrintSurface {
    file: NamedTempFile,
}

impl PrintSurface {
    pub fn create(document: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("school-invoice-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(with_print_hook(document).as_bytes())?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), "print surface created");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for PrintSurface {
    fn drop(&mut self) {
        tracing::debug!(path = %self.file.path().display(), "print surface disposed");
    }
}

fn with_print_hook(document: &str) -> String {
    match document.rfind("</body>") {
        Some(at) => {
            let mut out = String::with_capacity(document.len() + PRINT_HOOK.len());
            out.push_str(&document[..at]);
            out.push_str(PRINT_HOOK);
            out.push_str(&document[at..]);
            out
        }
        None => format!("{document}{PRINT_HOOK}"),
    }
}

/// Show `document` on a fresh print surface and trigger printing.
///
/// `grace` is how long the surface is kept around for the host to load it.
pub fn present_for_print(host: &dyn PrintHost, document: &str, grace: Duration) -> Result<()> {
    let surface = PrintSurface::create(document)?;
    host.present(surface.path())?;
    std::thread::sleep(grace);
    Ok(())
}
