use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::utils::{price::DEFAULT_TAX_RATE, quantity::DEFAULT_MAX_PARTICIPANTS};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid tax rate: {0}")]
    TaxRate(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailSettings {
    pub confirmation_template: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            confirmation_template: "booking_confirmation".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub tax_rate: f64,
    pub max_participants: u32,
    pub currency: String,
    pub email: EmailSettings,
}

impl Settings {
    pub fn load(config_path: &Option<String>) -> Result<Self, SettingsError> {
        let default = Self::default();

        let settings = match Self::load_from_file(config_path) {
            Ok(settings) => settings,
            Err(err) if config_path.is_none() => {
                warn!("Could not read config file: {err}. Using default configuration.",);
                default
            }
            Err(err) => return Err(err),
        };

        settings.validate()?;
        Ok(settings)
    }

    fn load_from_file(config_path: &Option<String>) -> Result<Self, SettingsError> {
        let (path, required) = match config_path.as_deref() {
            Some(path) => (path, true),
            None => ("config.toml", false),
        };

        let config = Config::builder()
            .add_source(File::with_name(path).required(required))
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        validate_tax_rate(self.tax_rate)?;
        Ok(())
    }

    /// Replaces the tax rate, holding the override to the same rules as the
    /// config file.
    pub fn with_tax_rate(mut self, tax_rate: f64) -> Result<Self, SettingsError> {
        self.tax_rate = validate_tax_rate(tax_rate)?;
        Ok(self)
    }

    pub fn with_max_participants(mut self, max_participants: u32) -> Self {
        self.max_participants = max_participants;
        self
    }
}

pub fn validate_tax_rate(tax_rate: f64) -> Result<f64, SettingsError> {
    if !tax_rate.is_finite() || tax_rate < 0.0 {
        return Err(SettingsError::TaxRate(tax_rate));
    }
    Ok(tax_rate)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            currency: "USD".to_string(),
            email: EmailSettings::default(),
        }
    }
}
