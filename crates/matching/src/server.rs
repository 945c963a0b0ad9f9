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

//! TCP accept loop for client sessions

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::engine::Engine;
use crate::session;

/// Accept client connections until Ctrl-C
///
/// Each accepted socket is converted back to a blocking stream and handed
/// to a dedicated session worker thread; the async side only accepts. The
/// workers are detached and drain on their own when their clients
/// disconnect.
pub async fn run(listener: TcpListener, engine: Arc<Engine>) -> Result<()> {
	let local_addr = listener
		.local_addr()
		.context("Failed to read listener address")?;
	info!(target: "server", %local_addr, "Listening for client sessions");

	loop {
		tokio::select! {
			_ = signal::ctrl_c() => {
				info!(target: "server", "Shutdown signal received");
				break;
			}
			accepted = listener.accept() => {
				let (socket, peer) = accepted.context("Failed to accept client connection")?;
				let stream = socket
					.into_std()
					.context("Failed to convert accepted socket")?;
				stream
					.set_nonblocking(false)
					.context("Failed to switch accepted socket to blocking mode")?;
				if let Err(e) = session::spawn(stream, engine.clone()) {
					error!(target: "server", %peer, error = %e, "Failed to spawn session worker");
				}
			}
		}
	}

	Ok(())
}
