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

//! Logging initialization for the matching service
//!
//! # Configuration
//!
//! - `RUST_LOG`: log level filter (default: `info`), per-module filters
//!   supported (`RUST_LOG=forge_matching=debug`)
//! - `LOG_DIR`: when set, logs go to daily-rolling files under
//!   `{LOG_DIR}/matching/`; when unset, logs go to stderr
//! - `LOG_TO_CONSOLE`: set to `true`, `1`, or `yes` to mirror file logs to
//!   stderr as well (only meaningful with `LOG_DIR`)
//!
//! Note: the audit stream is not a log. It has its own sink (see
//! [`crate::audit`]) and defaults to stdout precisely so the two never mix.

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use tracing_appender::{
	non_blocking,
	rolling::{self, Rotation},
};
use tracing_subscriber::{
	EnvFilter, fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt,
};

use crate::config::{DEFAULT_LOG_LEVEL, LOG_COMPONENT_NAME};

// Store log guard to prevent log loss on program exit
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

/// Setup daily-rolling file logging in `{log_dir}`
///
/// `tracing-appender` handles the rotation, so long-running processes will
/// automatically switch files when the date changes.
fn setup_file_logging(log_dir: &Path) -> Result<non_blocking::NonBlocking> {
	let file_appender = rolling::RollingFileAppender::builder()
		.rotation(Rotation::DAILY)
		.filename_prefix(LOG_COMPONENT_NAME.to_string())
		.filename_suffix("log")
		.build(log_dir)
		.with_context(|| {
			format!(
				"Failed to create rolling file appender in {}",
				log_dir.display()
			)
		})?;

	let (file_writer, guard) = non_blocking(file_appender);
	LOG_GUARD.set(guard).ok();

	Ok(file_writer)
}

/// Initialize logging
///
/// See module-level documentation for environment variable configuration.
pub fn init_logging() -> Result<()> {
	let log_level = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

	match env::var("LOG_DIR") {
		Ok(log_root) => {
			let log_dir = Path::new(&log_root).join(LOG_COMPONENT_NAME);
			std::fs::create_dir_all(&log_dir).with_context(|| {
				format!("Failed to create log directory: {}", log_dir.display())
			})?;

			let file_writer = setup_file_logging(&log_dir)?;

			let log_to_console = env::var("LOG_TO_CONSOLE")
				.map(|v| v == "true" || v == "1" || v == "yes")
				.unwrap_or(false);

			let file_layer = fmt::layer()
				.with_writer(file_writer)
				.with_ansi(false)
				.with_thread_ids(true)
				.with_target(true);

			if log_to_console {
				Registry::default()
					.with(filter)
					.with(file_layer)
					.with(fmt::layer().with_writer(std::io::stderr))
					.init();
			} else {
				Registry::default().with(filter).with(file_layer).init();
			}
		}
		Err(_) => {
			Registry::default()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}

	Ok(())
}
