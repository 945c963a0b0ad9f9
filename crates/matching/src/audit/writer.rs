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

use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use super::buffer::AuditConsumer;
use super::sink::AuditSink;
use super::AuditEvent;

/// Configuration for the audit writer
#[derive(Debug, Clone)]
pub struct AuditWriterConfig {
	/// Maximum number of events to batch before committing
	pub batch_size: usize,
	/// Maximum time to wait before committing a partial batch (milliseconds)
	pub flush_interval_ms: u64,
}

impl Default for AuditWriterConfig {
	fn default() -> Self {
		Self {
			batch_size: 256,
			flush_interval_ms: 50,
		}
	}
}

/// Audit writer - consumes events from the buffer and serializes them
///
/// The writer runs in a dedicated thread, draining events emitted by the
/// matching paths and appending them to the configured sink in batches. It
/// is the single consumer of the audit buffer, which makes the written log
/// a total order.
///
/// On shutdown the writer drains whatever is still queued before exiting,
/// so events emitted before `shutdown()` are never lost.
pub struct AuditWriter {
	thread_handle: Option<JoinHandle<()>>,
	shutdown: Arc<AtomicBool>,
}

impl AuditWriter {
	/// Start the audit writer with the given sink and configuration
	pub fn start(
		consumer: AuditConsumer,
		mut sink: Box<dyn AuditSink>,
		config: AuditWriterConfig,
	) -> Self {
		let shutdown = Arc::new(AtomicBool::new(false));
		let shutdown_clone = shutdown.clone();

		let thread_handle = thread::Builder::new()
			.name("audit-writer".to_string())
			.spawn(move || {
				info!(target: "audit", "Audit writer started");
				Self::run_writer_loop(&consumer, sink.as_mut(), &config, &shutdown_clone);
				info!(target: "audit", "Audit writer stopped");
			})
			.expect("Failed to spawn audit writer thread");

		Self {
			thread_handle: Some(thread_handle),
			shutdown,
		}
	}

	/// Main writer loop
	fn run_writer_loop(
		consumer: &AuditConsumer,
		sink: &mut dyn AuditSink,
		config: &AuditWriterConfig,
		shutdown: &Arc<AtomicBool>,
	) {
		let flush_interval = Duration::from_millis(config.flush_interval_ms);
		let mut pending: Vec<AuditEvent> = Vec::with_capacity(config.batch_size);
		let mut last_commit = Instant::now();

		loop {
			if shutdown.load(Ordering::Relaxed) {
				// Drain everything still queued, then commit one final time
				loop {
					let drained = consumer.drain(config.batch_size);
					if drained.is_empty() {
						break;
					}
					pending.extend(drained);
					if pending.len() >= config.batch_size {
						Self::commit(sink, &mut pending);
					}
				}
				Self::commit(sink, &mut pending);
				break;
			}

			let budget = config.batch_size.saturating_sub(pending.len());
			pending.extend(consumer.drain(budget));

			let should_commit = pending.len() >= config.batch_size
				|| (!pending.is_empty() && last_commit.elapsed() >= flush_interval);

			if should_commit {
				Self::commit(sink, &mut pending);
				last_commit = Instant::now();
			} else if pending.is_empty() {
				// Nothing to write, wait a bit
				thread::sleep(Duration::from_millis(1));
			}
		}
	}

	/// Commit pending events to the sink
	fn commit(sink: &mut dyn AuditSink, pending: &mut Vec<AuditEvent>) {
		if pending.is_empty() {
			return;
		}
		if let Err(e) = sink.append(pending).and_then(|()| sink.flush()) {
			// The events stay pending and are retried on the next commit
			error!(target: "audit", error = %e, "Failed to commit audit batch");
			thread::sleep(Duration::from_millis(100));
			return;
		}
		pending.clear();
	}

	/// Shutdown the audit writer, draining and flushing the buffer first
	pub fn shutdown(mut self) {
		info!(target: "audit", "Shutting down audit writer");
		self.shutdown.store(true, Ordering::Relaxed);

		if let Some(handle) = self.thread_handle.take()
			&& let Err(e) = handle.join()
		{
			warn!(target: "audit", "Audit writer thread panicked: {:?}", e);
		}
	}
}

impl Drop for AuditWriter {
	fn drop(&mut self) {
		self.shutdown.store(true, Ordering::Relaxed);
		if let Some(handle) = self.thread_handle.take()
			&& let Err(e) = handle.join()
		{
			let _ = Err::<(), _>(e);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::audit::{AuditBuffer, MemoryAuditSink};

	fn added(order_id: u32) -> AuditEvent {
		AuditEvent::OrderAdded {
			order_id,
			instrument: "GOOG".to_string(),
			price: 100,
			count: 1,
			is_sell: false,
			timestamp: 1000,
		}
	}

	#[test]
	fn test_writer_drains_buffer_on_shutdown() {
		let (producer, consumer) = AuditBuffer::new(100).split();
		let sink = MemoryAuditSink::new();
		let events = sink.events_handle();

		let writer = AuditWriter::start(
			consumer,
			Box::new(sink),
			AuditWriterConfig {
				batch_size: 4,
				flush_interval_ms: 10,
			},
		);

		for order_id in 0..10 {
			producer.emit(added(order_id));
		}

		writer.shutdown();

		let recorded = events.lock().unwrap();
		assert_eq!(recorded.len(), 10);
		// Buffer order is preserved through the writer
		let ids: Vec<u32> = recorded.iter().map(|e| e.order_id()).collect();
		assert_eq!(ids, (0..10).collect::<Vec<u32>>());
	}
}
