use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Get the XDG config directory for the site server
/// Returns ~/.config/bestlook or $XDG_CONFIG_HOME/bestlook
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|p| p.join("bestlook"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Get the default config file path
/// Returns ~/.config/bestlook/site.toml
pub fn site_config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("site.toml"))
}

/// Ensure the config directory exists, creating it if necessary.
/// On Unix, sets directory permissions to 0700 (owner only).
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = config_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&dir, perms)?;
        }
    }
    Ok(dir)
}

/// Write content to a file with restrictive permissions (0600 on Unix).
/// The site config carries the admin credential, so it goes through here.
pub fn write_secure(path: &Path, content: &str) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;

        file.write_all(content.as_bytes())?;
        return Ok(());
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
        Ok(())
    }
}
