use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::obfuscate;
use crate::paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Message store file. Falls back to the store crate's default
    /// (`<XDG data>/bestlook/messages.json`) when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    /// Base64-encoded admin password
    pub password_b64: String,
}

impl AdminConfig {
    /// Create from a plain password (will be base64 encoded)
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password_b64: obfuscate::encode(password),
        }
    }

    /// Get the decoded password
    pub fn password(&self) -> Result<String, ConfigError> {
        obfuscate::decode(&self.password_b64)
    }
}

/// Email-notification relay. Each accepted submission is forwarded to
/// this HTTP endpoint as JSON; delivery is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Relay endpoint URL
    pub endpoint: String,
    /// Destination mailbox
    pub to: String,
    /// Bearer token for the relay, if it requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    pub admin: AdminConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<NotifyConfig>,
}

impl SiteConfig {
    /// Check if a config exists at the default location
    pub fn exists() -> bool {
        paths::site_config_path()
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    /// Get the default config path
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        paths::site_config_path()
    }

    /// Load config from the default XDG location
    pub fn load() -> Result<Self, ConfigError> {
        let path = paths::site_config_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the default XDG location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = paths::site_config_path()?;
        paths::ensure_config_dir()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        paths::write_secure(path, &content)
    }
}

const PASSWORD_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random alphanumeric password of the given length
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..PASSWORD_CHARS.len());
            PASSWORD_CHARS[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> SiteConfig {
        SiteConfig {
            server: ServerConfig::default(),
            store: StoreConfig {
                data_file: Some(PathBuf::from("/var/lib/bestlook/messages.json")),
            },
            admin: AdminConfig::new("admin", "painted-door"),
            notify: Some(NotifyConfig {
                endpoint: "https://relay.example.com/send".to_string(),
                to: "office@bestlook.example".to_string(),
                token: None,
            }),
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.toml");

        let config = sample_config();
        config.save_to(&path).unwrap();

        let loaded = SiteConfig::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.admin.username, "admin");
        assert_eq!(loaded.admin.password().unwrap(), "painted-door");
        assert_eq!(
            loaded.store.data_file.as_deref(),
            Some(Path::new("/var/lib/bestlook/messages.json"))
        );
        assert_eq!(loaded.notify.unwrap().to, "office@bestlook.example");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = SiteConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn notify_section_is_optional() {
        let toml = r#"
            [server]
            bind_address = "0.0.0.0"
            port = 9000

            [admin]
            username = "admin"
            password_b64 = "cGFpbnRlZC1kb29y"
        "#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert!(config.notify.is_none());
        assert!(config.store.data_file.is_none());
        assert_eq!(config.admin.password().unwrap(), "painted-door");
    }

    #[test]
    fn generated_passwords_are_alphanumeric() {
        let pw1 = generate_password(16);
        let pw2 = generate_password(16);

        assert_eq!(pw1.len(), 16);
        assert!(pw1.chars().all(|c| c.is_ascii_alphanumeric()));
        // Vanishingly unlikely to collide
        assert_ne!(pw1, pw2);
    }
}
