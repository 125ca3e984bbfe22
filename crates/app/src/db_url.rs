use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub const MEMORY_URL: &str = "sqlite::memory:";

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == MEMORY_URL || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories so `SQLite` can open it.
///
/// # Errors
///
/// Fails if the URL has no path or the file system rejects the directory or
/// file creation.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == MEMORY_URL {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_full_urls_are_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), MEMORY_URL);
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.sqlite3"),
            "sqlite:///tmp/x.sqlite3"
        );
    }

    #[test]
    fn bare_paths_become_absolute_urls() {
        assert_eq!(
            normalize_sqlite_url("/var/lib/progress.db"),
            "sqlite:///var/lib/progress.db"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:/var/lib/progress.db"),
            "sqlite:///var/lib/progress.db"
        );
        let relative = normalize_sqlite_url("progress.sqlite3");
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("/progress.sqlite3"));
    }

    #[test]
    fn prepare_rejects_urls_without_path() {
        assert!(prepare_sqlite_file(MEMORY_URL).is_ok());
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://db").is_err());
    }
}
