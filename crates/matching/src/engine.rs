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

use std::sync::Arc;

use dashmap::DashMap;
use forge_sdk::types::{ClientCommand, Side};
use tracing::debug;

use crate::audit::AuditProducer;
use crate::instrument::InstrumentOrders;
use crate::liveness::Liveness;
use crate::types::OrderCommand;

/// Engine router: instrument symbol → book pair
///
/// Shared by every session worker. Buy and sell commands are routed to the
/// owning [`InstrumentOrders`]; cancels go straight to the process-wide
/// liveness registry and never need the instrument.
///
/// Instrument records are created on first use under the registry's write
/// lock and never removed, so the `Arc` handed out here stays valid for the
/// process lifetime. Concurrency across distinct instruments is fully
/// parallel; within one instrument, workers serialize on the book locks.
pub struct Engine {
	instruments: DashMap<String, Arc<InstrumentOrders>>,
	liveness: Arc<Liveness>,
	audit: AuditProducer,
}

impl Engine {
	pub fn new(audit: AuditProducer) -> Self {
		Self {
			instruments: DashMap::new(),
			liveness: Arc::new(Liveness::new()),
			audit,
		}
	}

	/// Dispatch one decoded client command
	pub fn dispatch(&self, command: ClientCommand) {
		match command {
			ClientCommand::Buy(order) => {
				debug!(target: "engine", order_id = order.order_id, instrument = %order.instrument, "Processing buy");
				self.instrument_orders(&order.instrument)
					.process(OrderCommand::new(Side::Buy, order));
			}
			ClientCommand::Sell(order) => {
				debug!(target: "engine", order_id = order.order_id, instrument = %order.instrument, "Processing sell");
				self.instrument_orders(&order.instrument)
					.process(OrderCommand::new(Side::Sell, order));
			}
			ClientCommand::Cancel(cancel) => {
				debug!(target: "engine", order_id = cancel.order_id, "Processing cancel");
				self.liveness.cancel(cancel.order_id, &self.audit);
			}
		}
	}

	/// Book pair for an instrument, creating it on first use
	fn instrument_orders(&self, instrument: &str) -> Arc<InstrumentOrders> {
		self.instruments
			.entry(instrument.to_string())
			.or_insert_with(|| {
				Arc::new(InstrumentOrders::new(
					self.liveness.clone(),
					self.audit.clone(),
				))
			})
			.value()
			.clone()
	}
}
