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

//! Matching engine service entry point
//!
//! Binds the session listener, wires the audit pipeline, and serves client
//! connections until interrupted. The audit stream goes to stdout unless
//! `MATCHING_AUDIT_LOG` names a file.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use forge_matching::audit::{AuditBuffer, AuditSink, AuditWriter, AuditWriterConfig, JsonLineSink};
use forge_matching::config::MatchingConfig;
use forge_matching::engine::Engine;
use forge_matching::{logging, server};

#[tokio::main]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();
	logging::init_logging()?;

	let config = MatchingConfig::from_env().unwrap_or_else(|e| {
		info!(error = %e, "No usable environment configuration, using defaults");
		MatchingConfig::default()
	});
	info!(?config, "Starting matching engine");

	let (producer, consumer) = AuditBuffer::new(config.audit_buffer_capacity).split();
	let sink = open_audit_sink(&config)?;
	let writer = AuditWriter::start(
		consumer,
		sink,
		AuditWriterConfig {
			batch_size: config.audit_batch_size,
			flush_interval_ms: config.audit_flush_interval_ms,
		},
	);

	let engine = Arc::new(Engine::new(producer));

	let listener = TcpListener::bind(config.bind_addr)
		.await
		.with_context(|| format!("Failed to bind {}", config.bind_addr))?;

	server::run(listener, engine).await?;

	// Flush whatever the sessions emitted before we leave
	writer.shutdown();
	info!("Matching engine stopped");

	Ok(())
}

fn open_audit_sink(config: &MatchingConfig) -> Result<Box<dyn AuditSink>> {
	match &config.audit_log {
		Some(path) => {
			let file = OpenOptions::new()
				.create(true)
				.append(true)
				.open(path)
				.with_context(|| format!("Failed to open audit log {}", path.display()))?;
			Ok(Box::new(JsonLineSink::new(file)))
		}
		None => Ok(Box::new(JsonLineSink::new(io::stdout()))),
	}
}
