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

use crossbeam::channel::{Receiver, Sender, TryRecvError, bounded};
use tracing::error;

use super::AuditEvent;

/// MPSC audit buffer between the matching paths and the audit writer
///
/// Session workers emit events while holding the liveness-table guard for
/// the corresponding state transition, so the arrival order in this buffer
/// is the total order of the audit log.
///
/// Properties:
/// - Multiple producers (one clone per session worker / emission site)
/// - Single consumer (audit writer)
/// - Bounded capacity: `emit` blocks when the writer falls behind
pub struct AuditBuffer {
	sender: Sender<AuditEvent>,
	receiver: Receiver<AuditEvent>,
}

impl AuditBuffer {
	/// Create a new audit buffer with the specified capacity
	pub fn new(capacity: usize) -> Self {
		let (sender, receiver) = bounded(capacity);
		Self { sender, receiver }
	}

	/// Split the buffer into producer and consumer ends
	///
	/// The producer end can be cloned freely; the consumer end must remain
	/// unique to the single writer.
	pub fn split(self) -> (AuditProducer, AuditConsumer) {
		(
			AuditProducer {
				sender: self.sender,
			},
			AuditConsumer {
				receiver: self.receiver,
			},
		)
	}
}

/// Producer end of the audit buffer
#[derive(Clone)]
pub struct AuditProducer {
	sender: Sender<AuditEvent>,
}

impl AuditProducer {
	/// Emit an event onto the audit stream
	///
	/// Blocks while the buffer is full. If the writer has shut down the
	/// event is dropped with a diagnostic; this only happens during process
	/// teardown, once the audit contract no longer has an observer.
	pub fn emit(&self, event: AuditEvent) {
		if self.sender.send(event).is_err() {
			error!(target: "audit", "audit writer disconnected, event dropped");
		}
	}
}

/// Consumer end of the audit buffer (used by the audit writer)
pub struct AuditConsumer {
	receiver: Receiver<AuditEvent>,
}

impl AuditConsumer {
	/// Receive an event from the buffer (blocking)
	pub fn recv(&self) -> Result<AuditEvent, AuditBufferError> {
		self.receiver
			.recv()
			.map_err(|_| AuditBufferError::Disconnected)
	}

	/// Try to receive an event from the buffer (non-blocking)
	pub fn try_recv(&self) -> Result<AuditEvent, AuditBufferError> {
		self.receiver.try_recv().map_err(|e| match e {
			TryRecvError::Empty => AuditBufferError::Empty,
			TryRecvError::Disconnected => AuditBufferError::Disconnected,
		})
	}

	/// Drain up to `max_count` events from the buffer (non-blocking)
	pub fn drain(&self, max_count: usize) -> Vec<AuditEvent> {
		let mut events = Vec::new();
		for _ in 0..max_count {
			match self.try_recv() {
				Ok(event) => events.push(event),
				Err(_) => break,
			}
		}
		events
	}
}

/// Errors that can occur when interacting with the audit buffer
#[derive(Debug, thiserror::Error)]
pub enum AuditBufferError {
	#[error("audit buffer is empty")]
	Empty,
	#[error("audit buffer disconnected")]
	Disconnected,
}
