// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// Logging configuration constants
/// Default log level (can be overridden by RUST_LOG environment variable)
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log directory component name
pub const LOG_COMPONENT_NAME: &str = "matching";

/// Matching engine configuration
///
/// Every field has a default, so a bare environment still yields a working
/// service. Environment variables use the `MATCHING_` prefix, e.g.
/// `MATCHING_BIND_ADDR=0.0.0.0:9000`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
	/// TCP bind address for client sessions
	pub bind_addr: SocketAddr,
	/// Audit log destination; stdout when unset
	pub audit_log: Option<PathBuf>,
	/// Capacity of the audit buffer between workers and the writer
	pub audit_buffer_capacity: usize,
	/// Audit writer batch size
	pub audit_batch_size: usize,
	/// Audit writer flush interval in milliseconds
	pub audit_flush_interval_ms: u64,
}

impl Default for MatchingConfig {
	fn default() -> Self {
		Self {
			bind_addr: "0.0.0.0:7001".parse().expect("default bind addr"),
			audit_log: None,
			audit_buffer_capacity: 8192,
			audit_batch_size: 256,
			audit_flush_interval_ms: 50,
		}
	}
}

impl MatchingConfig {
	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Environment::with_prefix("MATCHING"))
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from file, layered under the environment
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix("MATCHING"))
			.build()?;

		cfg.try_deserialize()
	}
}
