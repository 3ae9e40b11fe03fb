use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Hands `path` to the platform's default handler.
///
/// A result row can outlive the file it points to; opening a path that no
/// longer exists is a silent no-op rather than an error.
pub fn open_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    open_with_default(path)
}

fn open_with_default(path: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .with_context(|| format!("failed to open {}", path.display()))?;
        return Ok(());
    }
    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(path)
            .spawn()
            .with_context(|| format!("failed to open {}", path.display()))?;
        return Ok(());
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open")
            .arg(path)
            .spawn()
            .with_context(|| format!("failed to open {}", path.display()))?;
        return Ok(());
    }
}
