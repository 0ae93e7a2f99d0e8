//! Configuration loading for the router service.
//!
//! Loads a TOML file, substitutes `${VAR}` environment references, applies
//! `ROUTER_`-prefixed environment overrides and validates the result before
//! the engine is built from it.

use std::env;
use std::path::Path;

use thiserror::Error;

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "ROUTER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<RouterConfig, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			self.load_from_file(file_path).await?
		} else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		self.apply_env_overrides(&mut config)?;

		validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<RouterConfig, ConfigError> {
		let content = tokio::fs::read_to_string(file_path).await?;

		let substituted_content = self.substitute_env_vars(&content)?;

		let config: RouterConfig = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns
		let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value =
				env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut RouterConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.engine.log_level = log_level;
		}

		if let Ok(http_port) = env::var(format!("{}HTTP_PORT", self.env_prefix)) {
			config.engine.http_port = http_port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid HTTP port: {}", e)))?;
		}

		if let Ok(rpc_url) = env::var(format!("{}RPC_URL", self.env_prefix)) {
			config.quotes.rpc_url = rpc_url;
		}

		Ok(())
	}
}

fn validate_config(config: &RouterConfig) -> Result<(), ConfigError> {
	let hash = config.governance.admin_secret_hash.trim_start_matches("0x");
	let decoded = hex::decode(hash)
		.map_err(|e| ConfigError::ValidationError(format!("Invalid admin secret hash: {}", e)))?;
	if decoded.len() != 32 {
		return Err(ConfigError::ValidationError(
			"admin_secret_hash must be 32 bytes".to_string(),
		));
	}

	for asset in &config.assets {
		if asset.supported && asset.decimals == 0 {
			return Err(ConfigError::ValidationError(format!(
				"Supported asset {} has zero decimals",
				asset.address
			)));
		}
	}

	for entry in &config.slippage {
		if entry.bps > config.engine.max_slippage_bps {
			return Err(ConfigError::ValidationError(format!(
				"Slippage for ({}, {}) exceeds max of {} bps",
				entry.asset_in, entry.asset_out, config.engine.max_slippage_bps
			)));
		}
	}

	for entry in &config.routes {
		if entry.asset_in == entry.asset_out {
			return Err(ConfigError::ValidationError(format!(
				"Route from {} to itself",
				entry.asset_in
			)));
		}
		let known = |address| config.assets.iter().any(|a| a.address == address && a.supported);
		if !known(entry.asset_in) || !known(entry.asset_out) {
			return Err(ConfigError::ValidationError(format!(
				"Route ({}, {}) references an unsupported asset",
				entry.asset_in, entry.asset_out
			)));
		}
	}

	if config.engine.max_hops == 0 || config.engine.max_hops > 3 {
		return Err(ConfigError::ValidationError(
			"max_hops must be between 1 and 3".to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"
[engine]
name = "conversion-router"

[quotes]
rpc_url = "http://localhost:8545"
quoter_address = "0x61fFE014bA17989E743c5F6cB21bF9697530B21e"

[execution]
swap_router = "0xE592427A0AEce92De3Edee1F18E0157C05861564"

[governance]
admin_secret_hash = "0x290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563"

[[assets]]
address = "0x1111111111111111111111111111111111111111"
category = "eth_lst"
decimals = 18
supported = true

[[assets]]
address = "0x2222222222222222222222222222222222222222"
category = "eth_lst"
decimals = 18
supported = true

[[routes]]
asset_in = "0x1111111111111111111111111111111111111111"
asset_out = "0x2222222222222222222222222222222222222222"
kind = "concentrated_liquidity"
pool = "0x3333333333333333333333333333333333333333"
fee = 500

[[slippage]]
asset_in = "0x1111111111111111111111111111111111111111"
asset_out = "0x2222222222222222222222222222222222222222"
bps = 30
"#;

	#[test]
	fn test_parse_sample() {
		let config: RouterConfig = toml::from_str(SAMPLE).unwrap();
		assert_eq!(config.engine.name, "conversion-router");
		assert_eq!(config.engine.max_hops, 3);
		assert_eq!(config.engine.max_slippage_bps, 1_000);
		assert_eq!(config.assets.len(), 2);
		assert_eq!(config.routes.len(), 1);
		assert!(validate_config(&config).is_ok());

		match &config.routes[0].config {
			router_types::RouteConfig::ConcentratedLiquidity { fee, .. } => {
				assert_eq!(*fee, 500)
			}
			other => panic!("unexpected route config: {:?}", other),
		}
	}

	#[test]
	fn test_validate_rejects_excess_slippage() {
		let mut config: RouterConfig = toml::from_str(SAMPLE).unwrap();
		config.slippage[0].bps = 2_000;
		assert!(matches!(
			validate_config(&config),
			Err(ConfigError::ValidationError(_))
		));
	}

	#[test]
	fn test_validate_rejects_bad_secret_hash() {
		let mut config: RouterConfig = toml::from_str(SAMPLE).unwrap();
		config.governance.admin_secret_hash = "0xdead".to_string();
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_env_substitution() {
		env::set_var("ROUTER_TEST_SUB_URL", "http://example:8545");
		let loader = ConfigLoader::new();
		let out = loader
			.substitute_env_vars("rpc_url = \"${ROUTER_TEST_SUB_URL}\"")
			.unwrap();
		assert_eq!(out, "rpc_url = \"http://example:8545\"");
	}
}
