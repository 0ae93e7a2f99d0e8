//! Configuration model for the router.
//!
//! Everything governance can mutate at runtime is also expressible here as
//! the initial state: assets, category policies, routes, vetted slippage
//! pairs and the pool whitelist.

use std::collections::HashMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use router_types::{AssetCategory, AssetInfo, Capability, CategoryPolicy, RouteConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
	pub engine: EngineSettings,
	pub quotes: QuoteSettings,
	pub execution: ExecutionSettings,
	pub governance: GovernanceSettings,
	#[serde(default)]
	pub assets: Vec<AssetInfo>,
	#[serde(default)]
	pub categories: HashMap<AssetCategory, CategoryPolicy>,
	#[serde(default)]
	pub routes: Vec<RouteEntry>,
	#[serde(default)]
	pub slippage: Vec<SlippageEntry>,
	#[serde(default)]
	pub pools: Vec<PoolEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
	pub name: String,
	#[serde(default = "default_http_port")]
	pub http_port: u16,
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Hop budget for path discovery.
	#[serde(default = "default_max_hops")]
	pub max_hops: usize,
	/// Seconds added to now for every instruction deadline.
	#[serde(default = "default_deadline_window")]
	pub deadline_window_secs: u64,
	/// Upper bound for any slippage tolerance, vetted or combined.
	#[serde(default = "default_max_slippage_bps")]
	pub max_slippage_bps: u16,
	/// Tolerance applied to live quotes for pairs without a vetted entry.
	#[serde(default = "default_live_slippage_bps")]
	pub default_live_slippage_bps: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSettings {
	/// JSON-RPC endpoint used for live quotes.
	pub rpc_url: String,
	/// Concentrated-liquidity quoter contract.
	pub quoter_address: Address,
	/// Per-call timeout in milliseconds.
	#[serde(default = "default_quote_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSettings {
	/// Periphery router targeted by concentrated-liquidity instructions.
	pub swap_router: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceSettings {
	/// Hex-encoded keccak256 of the administrative secret.
	pub admin_secret_hash: String,
	/// Seconds a registered external venue stays unusable and unremovable.
	#[serde(default = "default_cooling_off")]
	pub cooling_off_secs: u64,
	#[serde(default)]
	pub grants: Vec<CapabilityGrant>,
}

/// Capabilities granted to one credential holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityGrant {
	pub holder: String,
	pub capabilities: Vec<Capability>,
}

/// Initial route table entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
	pub asset_in: Address,
	pub asset_out: Address,
	#[serde(flatten)]
	pub config: RouteConfig,
}

/// Pre-vetted slippage tolerance for an ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippageEntry {
	pub asset_in: Address,
	pub asset_out: Address,
	pub bps: u16,
}

/// Pool whitelist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEntry {
	pub address: Address,
	#[serde(default = "default_token_count")]
	pub token_count: u8,
	/// Pool exposes the underlying-asset exchange variant.
	#[serde(default)]
	pub underlying: bool,
}

fn default_http_port() -> u16 {
	8080
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_max_hops() -> usize {
	3
}

fn default_deadline_window() -> u64 {
	300
}

fn default_max_slippage_bps() -> u16 {
	1_000
}

fn default_live_slippage_bps() -> u16 {
	50
}

fn default_quote_timeout_ms() -> u64 {
	5_000
}

fn default_cooling_off() -> u64 {
	604_800
}

fn default_token_count() -> u8 {
	2
}
