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

use std::io::Write;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::AuditEvent;

/// Error types for audit sink operations
#[derive(Debug, Error)]
pub enum SinkError {
	#[error("failed to write audit record: {0}")]
	Io(#[from] std::io::Error),
	#[error("failed to encode audit record: {0}")]
	Encode(#[from] serde_json::Error),
}

/// Destination for the serialized audit stream
///
/// The writer appends batches in buffer order and flushes between batches,
/// so whatever backs the sink sees the same total order the engine emitted.
///
/// Implementations:
/// - [`JsonLineSink`]: one JSON object per line over any writer (stdout, an
///   append-mode file)
/// - [`MemoryAuditSink`]: in-memory vector for tests and benchmarks
pub trait AuditSink: Send {
	/// Append a batch of events to the sink
	fn append(&mut self, events: &[AuditEvent]) -> Result<(), SinkError>;

	/// Flush buffered output to the backing destination
	fn flush(&mut self) -> Result<(), SinkError> {
		Ok(())
	}
}

/// JSON-lines audit sink over any `Write` destination
pub struct JsonLineSink<W: Write + Send> {
	writer: W,
}

impl<W: Write + Send> JsonLineSink<W> {
	pub fn new(writer: W) -> Self {
		Self { writer }
	}

	/// Access the underlying writer (used by tests)
	pub fn get_ref(&self) -> &W {
		&self.writer
	}
}

impl<W: Write + Send> AuditSink for JsonLineSink<W> {
	fn append(&mut self, events: &[AuditEvent]) -> Result<(), SinkError> {
		for event in events {
			serde_json::to_writer(&mut self.writer, event)?;
			self.writer.write_all(b"\n")?;
		}
		Ok(())
	}

	fn flush(&mut self) -> Result<(), SinkError> {
		self.writer.flush()?;
		Ok(())
	}
}

/// In-memory audit sink
///
/// Stores every appended event behind a shared handle so tests can inspect
/// the log after the writer has consumed it. No durability, no I/O.
pub struct MemoryAuditSink {
	events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
	pub fn new() -> Self {
		Self {
			events: Arc::new(Mutex::new(Vec::new())),
		}
	}

	/// Shared handle onto the recorded events
	///
	/// Clones of the handle stay valid after the sink itself has been moved
	/// into an [`super::AuditWriter`].
	pub fn events_handle(&self) -> Arc<Mutex<Vec<AuditEvent>>> {
		self.events.clone()
	}
}

impl Default for MemoryAuditSink {
	fn default() -> Self {
		Self::new()
	}
}

impl AuditSink for MemoryAuditSink {
	fn append(&mut self, events: &[AuditEvent]) -> Result<(), SinkError> {
		self.events
			.lock()
			.expect("audit sink mutex poisoned")
			.extend_from_slice(events);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn deleted(order_id: u32, accepted: bool) -> AuditEvent {
		AuditEvent::OrderDeleted {
			order_id,
			accepted,
			timestamp: 5,
		}
	}

	#[test]
	fn test_memory_sink_records_in_order() {
		let mut sink = MemoryAuditSink::new();
		let handle = sink.events_handle();

		sink.append(&[deleted(1, true), deleted(2, false)]).unwrap();

		let events = handle.lock().unwrap();
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].order_id(), 1);
		assert_eq!(events[1].order_id(), 2);
	}

	#[test]
	fn test_json_line_sink_writes_one_line_per_event() {
		let mut sink = JsonLineSink::new(Vec::new());
		sink.append(&[deleted(7, true)]).unwrap();
		sink.flush().unwrap();

		let output = String::from_utf8(sink.get_ref().clone()).unwrap();
		assert_eq!(output.lines().count(), 1);
		assert!(output.contains(r#""event":"order_deleted""#));
		assert!(output.contains(r#""order_id":7"#));
		assert!(output.contains(r#""accepted":true"#));
	}
}
