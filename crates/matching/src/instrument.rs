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

use forge_sdk::types::Side;
use tracing::debug;

use crate::audit::{AuditEvent, AuditProducer};
use crate::book::OrderBook;
use crate::clock;
use crate::liveness::Liveness;
use crate::types::OrderCommand;

/// The book pair for one instrument
///
/// Owns the buy side and the sell side and runs the match loop for every
/// incoming order on the instrument. Workers for different instruments
/// never contend on these locks; workers on the same instrument serialize
/// through them.
pub struct InstrumentOrders {
	buy_book: OrderBook,
	sell_book: OrderBook,
	liveness: Arc<Liveness>,
	audit: AuditProducer,
}

impl InstrumentOrders {
	pub fn new(liveness: Arc<Liveness>, audit: AuditProducer) -> Self {
		Self {
			buy_book: OrderBook::new(),
			sell_book: OrderBook::new(),
			liveness,
			audit,
		}
	}

	/// Process an incoming buy or sell order
	///
	/// Runs until the order is fully executed or rests on its own book.
	pub fn process(&self, mut command: OrderCommand) {
		self.match_incoming(&mut command);
	}

	/// The match loop
	///
	/// Each iteration either consumes the opposite side's top (fully or
	/// partially), rests the incoming order, or retries after losing a race
	/// against a concurrent cancel or fill of the peeked top.
	///
	/// Locking per iteration: the opposite queue lock is held from the peek
	/// through the pop/replace decision so no new resting order can ambush
	/// it; the liveness lock is taken last and held across event emission,
	/// which is what gives every order id a totally ordered event history.
	fn match_incoming(&self, command: &mut OrderCommand) {
		let opp_book = match command.side {
			Side::Buy => &self.sell_book,
			Side::Sell => &self.buy_book,
		};

		'incoming: while command.count > 0 {
			let mut opp_queue = opp_book.lock_queue();
			let mut top = {
				let entries = self.liveness.lock();
				OrderBook::live_top(&mut opp_queue, &entries)
			};

			// Find a crossing top, or rest the order and return. A failed
			// try_add_resting means a crossing order appeared while the
			// locks were down, so re-peek and try again.
			let top = loop {
				match top.take() {
					Some(resting) if resting.crosses(command) => break resting,
					_ => {
						drop(opp_queue);
						if OrderBook::try_add_resting(
							command,
							&self.buy_book,
							&self.sell_book,
							&self.liveness,
							&self.audit,
						) {
							return;
						}
						debug!(
							target: "instrument",
							order_id = command.order_id,
							"Crossing order appeared while resting, resuming match"
						);
						opp_queue = opp_book.lock_queue();
						let entries = self.liveness.lock();
						top = OrderBook::live_top(&mut opp_queue, &entries);
					}
				}
			};

			// The top crosses. Re-take the liveness lock (still holding the
			// opposite queue lock) so the top cannot be cancelled under us.
			let mut entries = self.liveness.lock();

			if command.count >= top.count {
				// Incoming consumes the entire resting top
				if !OrderBook::pop_top_if_live(&mut opp_queue, &mut entries) {
					continue 'incoming;
				}
				let timestamp = clock::timestamp_ns();
				drop(opp_queue);
				command.count -= top.count;
				self.audit.emit(AuditEvent::OrderExecuted {
					resting_id: top.order_id,
					incoming_id: command.order_id,
					execution_id: top.execution_id + 1,
					price: top.price,
					quantity: top.count,
					timestamp,
				});
			} else {
				// Incoming is smaller: the top stays, with reduced count
				let replacement = top.after_fill(command.count);
				let execution_id = replacement.execution_id;
				if !OrderBook::replace_top_if_live(replacement, &mut opp_queue, &entries) {
					continue 'incoming;
				}
				let timestamp = clock::timestamp_ns();
				drop(opp_queue);
				self.audit.emit(AuditEvent::OrderExecuted {
					resting_id: top.order_id,
					incoming_id: command.order_id,
					execution_id,
					price: top.price,
					quantity: command.count,
					timestamp,
				});
				command.count = 0;
			}
			// The liveness guard drops here, after emission: events for the
			// consumed id cannot interleave with its terminal transition.
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::audit::AuditBuffer;

	fn instrument() -> (InstrumentOrders, crate::audit::AuditConsumer) {
		let (producer, consumer) = AuditBuffer::new(1024).split();
		(
			InstrumentOrders::new(Arc::new(Liveness::new()), producer),
			consumer,
		)
	}

	fn order(side: Side, order_id: u32, price: u32, count: u32) -> OrderCommand {
		OrderCommand {
			side,
			order_id,
			price,
			count,
			instrument: "GOOG".to_string(),
		}
	}

	#[test]
	fn test_non_crossing_orders_rest() {
		let (orders, consumer) = instrument();

		orders.process(order(Side::Buy, 1, 100, 10));
		orders.process(order(Side::Sell, 2, 110, 10));

		let events = consumer.drain(1024);
		assert_eq!(events.len(), 2);
		assert!(matches!(
			events[0],
			AuditEvent::OrderAdded { order_id: 1, .. }
		));
		assert!(matches!(
			events[1],
			AuditEvent::OrderAdded {
				order_id: 2,
				is_sell: true,
				..
			}
		));
	}

	#[test]
	fn test_incoming_sweeps_multiple_resting_levels() {
		let (orders, consumer) = instrument();

		orders.process(order(Side::Sell, 1, 50, 5));
		orders.process(order(Side::Sell, 2, 51, 5));
		orders.process(order(Side::Buy, 3, 55, 12));

		let events = consumer.drain(1024);
		// Two adds, two executions (cheapest sell first), then the
		// remainder of the buy rests
		assert_eq!(events.len(), 5);
		match &events[2] {
			AuditEvent::OrderExecuted {
				resting_id,
				incoming_id,
				execution_id,
				price,
				quantity,
				..
			} => {
				assert_eq!((*resting_id, *incoming_id), (1, 3));
				assert_eq!(*execution_id, 1);
				assert_eq!((*price, *quantity), (50, 5));
			}
			other => panic!("expected OrderExecuted, got {:?}", other),
		}
		match &events[3] {
			AuditEvent::OrderExecuted {
				resting_id,
				price,
				quantity,
				..
			} => {
				assert_eq!(*resting_id, 2);
				assert_eq!((*price, *quantity), (51, 5));
			}
			other => panic!("expected OrderExecuted, got {:?}", other),
		}
		match &events[4] {
			AuditEvent::OrderAdded {
				order_id, count, ..
			} => {
				assert_eq!(*order_id, 3);
				assert_eq!(*count, 2);
			}
			other => panic!("expected OrderAdded, got {:?}", other),
		}
	}

	#[test]
	fn test_partial_fill_keeps_resting_top() {
		let (orders, consumer) = instrument();

		orders.process(order(Side::Sell, 1, 50, 10));
		orders.process(order(Side::Buy, 2, 50, 3));
		orders.process(order(Side::Buy, 3, 50, 4));

		let events = consumer.drain(1024);
		assert_eq!(events.len(), 3);
		// Same resting order fills twice with increasing execution ids
		match (&events[1], &events[2]) {
			(
				AuditEvent::OrderExecuted {
					resting_id: first_resting,
					execution_id: first_execution,
					quantity: first_quantity,
					..
				},
				AuditEvent::OrderExecuted {
					resting_id: second_resting,
					execution_id: second_execution,
					quantity: second_quantity,
					..
				},
			) => {
				assert_eq!((*first_resting, *second_resting), (1, 1));
				assert_eq!((*first_execution, *second_execution), (1, 2));
				assert_eq!((*first_quantity, *second_quantity), (3, 4));
			}
			other => panic!("expected two OrderExecuted, got {:?}", other),
		}
	}
}
