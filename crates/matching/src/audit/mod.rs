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

mod buffer;
mod sink;
mod writer;

use forge_sdk::types::OrderId;
use serde::{Deserialize, Serialize};

pub use buffer::{AuditBuffer, AuditBufferError, AuditConsumer, AuditProducer};
pub use sink::{AuditSink, JsonLineSink, MemoryAuditSink, SinkError};
pub use writer::{AuditWriter, AuditWriterConfig};

/// Events externalized on the audit stream
///
/// The audit stream is the engine's only output: every state change a client
/// can cause is visible here and nowhere else. The per-order contract is
/// `OrderAdded`, then zero or more `OrderExecuted` with strictly increasing
/// `execution_id`, then at most one terminal event (a final `OrderExecuted`
/// consuming the last unit, or an accepted `OrderDeleted`).
///
/// The order in which events enter the audit buffer is the total order of
/// the log; the writer drains the buffer serially.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
	/// Order rests on its book
	OrderAdded {
		order_id: OrderId,
		instrument: String,
		price: u32,
		count: u32,
		is_sell: bool,
		timestamp: u64,
	},

	/// One partial or full fill; the price is always the resting order's
	OrderExecuted {
		resting_id: OrderId,
		incoming_id: OrderId,
		execution_id: u32,
		price: u32,
		quantity: u32,
		timestamp: u64,
	},

	/// Cancel outcome; `accepted` is false for unknown or already-ended ids
	OrderDeleted {
		order_id: OrderId,
		accepted: bool,
		timestamp: u64,
	},
}

impl AuditEvent {
	/// Get the resting-side order ID this event concerns
	pub fn order_id(&self) -> OrderId {
		match self {
			AuditEvent::OrderAdded { order_id, .. } => *order_id,
			AuditEvent::OrderExecuted { resting_id, .. } => *resting_id,
			AuditEvent::OrderDeleted { order_id, .. } => *order_id,
		}
	}

	/// Get the timestamp of this event
	pub fn timestamp(&self) -> u64 {
		match self {
			AuditEvent::OrderAdded { timestamp, .. } => *timestamp,
			AuditEvent::OrderExecuted { timestamp, .. } => *timestamp,
			AuditEvent::OrderDeleted { timestamp, .. } => *timestamp,
		}
	}
}
