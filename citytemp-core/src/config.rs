use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides the configured contact address.
pub const CONTACT_EMAIL_ENV: &str = "EMAIL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// contact_email = "me@example.com"
/// timeout_secs = 15
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Contact address sent to the geocoding service in the `User-Agent`.
    pub contact_email: Option<String>,

    /// Override for the place-search endpoint.
    pub geocoding_url: Option<String>,

    /// Override for the forecast endpoint.
    pub forecast_url: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Immutable settings every request is built from, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub contact_email: String,
    pub user_agent: String,
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Load config from disk with environment overrides applied.
    pub fn load_with_env() -> Result<Self> {
        Ok(Self::load()?.apply_env(|name| std::env::var(name).ok()))
    }

    /// Apply overrides read through `var`; only [`CONTACT_EMAIL_ENV`] is consulted.
    pub fn apply_env(self, var: impl Fn(&str) -> Option<String>) -> Self {
        self.with_contact_override(var(CONTACT_EMAIL_ENV))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citytemp", "citytemp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_contact_email(&mut self, email: String) {
        self.contact_email = Some(email.trim().to_string());
    }

    /// Replace the contact address with `value` when it is set, e.g. from
    /// the `EMAIL` environment variable.
    pub fn with_contact_override(mut self, value: Option<String>) -> Self {
        if let Some(email) = value {
            self.set_contact_email(email);
        }
        self
    }

    /// Contact address, if one is configured and non-blank.
    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Resolve into [`Settings`]. A missing contact address is fatal.
    pub fn resolve(&self) -> Result<Settings> {
        let contact_email = self.contact_email().ok_or_else(|| {
            anyhow!(
                "No contact email configured.\n\
                 Hint: set the {CONTACT_EMAIL_ENV} environment variable or run `citytemp configure`."
            )
        })?;

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than 0"));
        }

        Ok(Settings {
            contact_email: contact_email.to_string(),
            user_agent: user_agent_for(contact_email),
            geocoding_url: self
                .geocoding_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GEOCODING_URL.to_string()),
            forecast_url: self
                .forecast_url
                .clone()
                .unwrap_or_else(|| DEFAULT_FORECAST_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// `User-Agent` identifying this app and who to contact about its traffic.
pub fn user_agent_for(contact_email: &str) -> String {
    format!("citytemp/{} ({contact_email})", env!("CARGO_PKG_VERSION"))
}

impl Settings {
    /// Settings with default endpoints for the given contact address.
    pub fn with_contact(contact_email: &str) -> Self {
        Self {
            contact_email: contact_email.to_string(),
            user_agent: user_agent_for(contact_email),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
