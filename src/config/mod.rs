mod draft;
mod school;

pub use draft::Draft;
pub use school::{Config, InvoiceSettings, PrintSettings, SchoolInfo};
pub(crate) use school::default_date_format;

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.school-invoice/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "school-invoice") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".school-invoice"))
}

fn ensure_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        return Err(InvoiceError::ConfigNotFound(config_dir.to_path_buf()));
    }
    Ok(())
}

fn load_toml<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T> {
    if !path.exists() {
        return Err(InvoiceError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    tracing::debug!(path = %path.display(), "loading");
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    ensure_dir(config_dir)?;
    load_toml(config_dir.join("config.toml"))
}

/// Load draft.toml (a fresh one-item draft if missing)
pub fn load_draft(config_dir: &Path) -> Result<Draft> {
    ensure_dir(config_dir)?;
    let path = config_dir.join("draft.toml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no draft yet, starting a new one");
        return Ok(Draft::default());
    }
    load_toml(path)
}

/// Save draft.toml
pub fn save_draft(config_dir: &Path, draft: &Draft) -> Result<()> {
    save_toml(config_dir.join("draft.toml"), draft)
}

fn save_toml<T: Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let content = match toml::to_string_pretty(value) {
        Ok(content) => content,
        Err(source) => return Err(InvoiceError::ConfigWrite { path, source }),
    };
    fs::write(&path, content)?;
    tracing::debug!(path = %path.display(), "saved");
    Ok(())
}

/// Create the config directory with template files
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if config_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(config_dir.join("draft.toml"), DRAFT_TEMPLATE)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[school]
name = "Sala-IT"
phone = "(+855)11 504 463"
telegram = "@phanith_noch"
telegram_url = "https://t.me/phanith_noch"
email = "nochphanith@gmail.com"
website = "app.salaitdevelopment.com"
website_url = "https://app.salaitdevelopment.com"
slogan = "Thank you for choosing Sala-IT. Unlock your potential and grow with technology!"
remark = "Please note that once payment has been made, it cannot be refunded."
logo_url = "https://app.salaitdevelopment.com/logo.png"
signature_url = "https://app.salaitdevelopment.com/signature.png"

[invoice]
currency_symbol = "$"
currency_code = "USD"       # shown in the amount column headers
date_format = "%-d %B %Y"   # e.g., 18 October 2026
placeholder = "N/A"         # shown for missing student details

[validation]
require_name = true         # refuse to print without a student name
check_email = true          # reject malformed email addresses

[print]
# The temporary invoice file is deleted after this many milliseconds.
# Raise it if the browser starts slowly and opens an empty or missing page.
cleanup_delay_ms = 1500
"#;

/// Template content for draft.toml
pub const DRAFT_TEMPLATE: &str = r#"# The invoice being prepared. Edit it here or with the
# student / add-item / update-item / remove-item commands.
#
# remark = "Overrides the school remark for this invoice"

[student]
name = "San Ratana"
email = "sanratana18@gmail.com"
phone = "(+855)96 434 7813"

[[items]]
id = 1
description = "Basic Web Development course"
discount = 0.0
amount = 60.0
"#;
