//! Configuration loading for the marketplace engine
//!
//! Supports JSON configuration files for:
//! - Server bind address
//! - Engine settings (timeouts, cancellation policy, match weights)
//! - Seed users, product listings and demand requests

use ashmart_core::{CancellationPolicy, NewDemand, NewProduct, Role, TransitionPolicy, UserId};
use ashmart_matching::MatchWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::application::EngineSettings;

/// Root configuration for the marketplace engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Deployment name
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Users known before anyone calls in
    #[serde(default)]
    pub users: Vec<UserSeed>,

    /// Listings created at startup
    #[serde(default)]
    pub products: Vec<ProductSeed>,

    /// Demand requests created at startup
    #[serde(default)]
    pub demands: Vec<DemandSeed>,
}

fn default_name() -> String {
    "Ashmart Marketplace".to_string()
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            users: Vec::new(),
            products: Vec::new(),
            demands: Vec::new(),
        }
    }
}

impl MarketplaceConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        for user in &self.users {
            UserId::new(user.user_id.as_str())
                .map_err(|e| ConfigError::Invalid(format!("user seed: {}", e)))?;
        }
        Ok(())
    }

    pub fn settings(&self) -> EngineSettings {
        self.engine.settings()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Time budget for each store call
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,

    /// Who may cancel an order the supplier already confirmed
    #[serde(default)]
    pub confirmed_cancellation: CancellationPolicy,

    /// How often expired demands are swept; 0 disables the sweep
    #[serde(default = "default_sweep_interval_secs")]
    pub expiry_sweep_interval_secs: u64,

    #[serde(default = "default_suggestions_per_entity")]
    pub suggestions_per_entity: usize,

    #[serde(default)]
    pub weights: MatchWeights,
}

fn default_operation_timeout_ms() -> u64 {
    2000
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_suggestions_per_entity() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout_ms(),
            confirmed_cancellation: CancellationPolicy::default(),
            expiry_sweep_interval_secs: default_sweep_interval_secs(),
            suggestions_per_entity: default_suggestions_per_entity(),
            weights: MatchWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "engine.operation_timeout_ms must be positive".to_string(),
            ));
        }
        if self.suggestions_per_entity == 0 {
            return Err(ConfigError::Invalid(
                "engine.suggestions_per_entity must be positive".to_string(),
            ));
        }
        self.weights
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("engine.weights: {}", e)))
    }

    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            operation_timeout: Duration::from_millis(self.operation_timeout_ms),
            transition_policy: TransitionPolicy::new(self.confirmed_cancellation),
            suggestions_per_entity: self.suggestions_per_entity,
            weights: self.weights,
        }
    }

    pub fn expiry_sweep_interval(&self) -> Option<Duration> {
        (self.expiry_sweep_interval_secs > 0)
            .then(|| Duration::from_secs(self.expiry_sweep_interval_secs))
    }
}

/// A user entry for the local directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSeed {
    pub user_id: String,
    pub role: Role,
}

/// A listing created on behalf of `supplier_id` at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSeed {
    pub supplier_id: String,
    #[serde(flatten)]
    pub listing: NewProduct,
}

/// A demand created on behalf of `buyer_id` at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandSeed {
    pub buyer_id: String,
    #[serde(flatten)]
    pub request: NewDemand,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to seed {entity}: {message}")]
    Seed {
        entity: &'static str,
        message: String,
    },
}
