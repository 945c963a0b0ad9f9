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

//! Per-connection session workers
//!
//! Each accepted connection gets its own OS thread running a blocking read
//! loop: one framed command per line, dispatched into the shared engine.
//! EOF ends the session cleanly; a framing or I/O error ends it with a
//! diagnostic. Nothing is ever written back on the connection.

use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use forge_sdk::wire;
use tracing::{error, info};
use uuid::Uuid;

use crate::engine::Engine;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Spawn a worker thread for one client session
///
/// The worker shares the engine router with every other session; it is
/// detached, ending on its own when the client disconnects or breaks the
/// framing protocol.
pub fn spawn(stream: TcpStream, engine: Arc<Engine>) -> std::io::Result<JoinHandle<()>> {
	let session_seq = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
	let session_id = Uuid::new_v4();

	thread::Builder::new()
		.name(format!("session-{}", session_seq))
		.spawn(move || run_session(stream, engine, session_id))
}

/// Blocking read loop for one session
fn run_session(stream: TcpStream, engine: Arc<Engine>, session_id: Uuid) {
	let peer = stream
		.peer_addr()
		.map(|addr| addr.to_string())
		.unwrap_or_else(|_| "unknown".to_string());
	info!(target: "session", session = %session_id, %peer, "Session started");

	let reader = BufReader::new(stream);
	for line in reader.lines() {
		let line = match line {
			Ok(line) => line,
			Err(e) => {
				error!(target: "session", session = %session_id, %peer, error = %e, "Error reading input");
				return;
			}
		};

		// Tolerate blank lines between frames
		if line.trim().is_empty() {
			continue;
		}

		match wire::decode_line(&line) {
			Ok(command) => engine.dispatch(command),
			Err(e) => {
				error!(
					target: "session",
					session = %session_id,
					%peer,
					error = %e,
					"Malformed command frame, closing session"
				);
				return;
			}
		}
	}

	info!(target: "session", session = %session_id, %peer, "Client disconnected");
}
