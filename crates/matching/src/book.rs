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

use std::collections::{BinaryHeap, HashMap};
use std::sync::{Mutex, MutexGuard};

use forge_sdk::types::{OrderId, Side};
use tracing::debug;

use crate::audit::{AuditEvent, AuditProducer};
use crate::liveness::Liveness;
use crate::order::Order;
use crate::types::OrderCommand;

/// One side of an instrument's book
///
/// A priority queue of resting orders keyed by price-time, guarded by a
/// per-side queue lock. Cancelled and fully-executed orders linger in the
/// heap as stale entries; the primitives here consult the liveness table
/// and reap them lazily.
///
/// Lock ordering is fixed across the engine: buy queue, then sell queue,
/// then the liveness table. Paths that need a single queue lock may follow
/// it with the table lock; the reverse never happens. The primitives take
/// the guarded data as parameters so every caller demonstrably holds what
/// the contract requires.
pub struct OrderBook {
	queue: Mutex<BinaryHeap<Order>>,
}

impl OrderBook {
	pub fn new() -> Self {
		Self {
			queue: Mutex::new(BinaryHeap::new()),
		}
	}

	/// Lock this side's queue
	pub fn lock_queue(&self) -> MutexGuard<'_, BinaryHeap<Order>> {
		self.queue.lock().expect("order book mutex poisoned")
	}

	/// Top live resting order, reaping stale entries along the way
	///
	/// Pops ended orders off the heap until the top is live, then returns a
	/// copy of it (the heap entry stays put). Empty when the side is
	/// exhausted. Caller holds this side's queue lock and the liveness lock.
	pub fn live_top(
		queue: &mut BinaryHeap<Order>,
		entries: &HashMap<OrderId, bool>,
	) -> Option<Order> {
		loop {
			let top = queue.peek()?;
			if !Liveness::is_ended(entries, top.order_id) {
				return Some(top.clone());
			}
			queue.pop();
		}
	}

	/// Pop the current top, marking it ended
	///
	/// Returns `false` if the top had already ended (a concurrent cancel won
	/// the race, or the heap emptied); the caller must re-peek and retry.
	/// On `true` the popped id's terminal transition has happened and the
	/// caller owns emitting its final `OrderExecuted`.
	pub fn pop_top_if_live(
		queue: &mut BinaryHeap<Order>,
		entries: &mut HashMap<OrderId, bool>,
	) -> bool {
		let Some(order) = queue.pop() else {
			return false;
		};
		!matches!(entries.insert(order.order_id, true), Some(true))
	}

	/// Replace the current top with a partially filled copy of itself
	///
	/// Pops the top and, if it is still live, pushes `replacement` (same id,
	/// decremented count, incremented execution id). Returns `false` if the
	/// top had already ended; the stale entry is discarded either way and
	/// the caller must re-peek and retry.
	pub fn replace_top_if_live(
		replacement: Order,
		queue: &mut BinaryHeap<Order>,
		entries: &HashMap<OrderId, bool>,
	) -> bool {
		let Some(order) = queue.pop() else {
			return false;
		};
		if Liveness::is_ended(entries, order.order_id) {
			return false;
		}
		queue.push(replacement);
		true
	}

	/// Atomically decide "nothing to match" and rest the order
	///
	/// Takes both queue locks plus the liveness lock in the canonical order,
	/// re-checks the opposite side for a crossing live top, and only then
	/// publishes the order: push onto its own side, register as live, emit
	/// `OrderAdded`. Returns `false` if a crossing top appeared, in which
	/// case the match loop must resume against it.
	///
	/// The joint locking is what keeps the no-cross invariant: between the
	/// "opposite side has nothing for us" observation and the publish, no
	/// other worker can slip a crossing order into either book.
	pub fn try_add_resting(
		command: &OrderCommand,
		buy_book: &OrderBook,
		sell_book: &OrderBook,
		liveness: &Liveness,
		audit: &AuditProducer,
	) -> bool {
		let mut buy_queue = buy_book.lock_queue();
		let mut sell_queue = sell_book.lock_queue();
		let mut entries = liveness.lock();

		let (own_queue, opp_queue) = match command.side {
			Side::Buy => (&mut *buy_queue, &mut *sell_queue),
			Side::Sell => (&mut *sell_queue, &mut *buy_queue),
		};

		if let Some(top) = Self::live_top(opp_queue, &entries) {
			if top.crosses(command) {
				return false;
			}
		}

		let resting = Order::from_command(command);
		debug!(
			target: "book",
			order_id = resting.order_id,
			instrument = %resting.instrument,
			side = ?resting.side,
			price = resting.price,
			count = resting.count,
			"Order resting"
		);
		audit.emit(AuditEvent::OrderAdded {
			order_id: resting.order_id,
			instrument: resting.instrument.clone(),
			price: resting.price,
			count: resting.count,
			is_sell: resting.side.is_sell(),
			timestamp: resting.timestamp,
		});
		own_queue.push(resting);
		entries.insert(command.order_id, false);
		true
	}
}

impl Default for OrderBook {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::audit::AuditBuffer;

	fn resting(side: Side, order_id: OrderId, price: u32, timestamp: u64) -> Order {
		Order {
			side,
			order_id,
			price,
			count: 10,
			instrument: "GOOG".to_string(),
			execution_id: 0,
			timestamp,
		}
	}

	fn command(side: Side, order_id: OrderId, price: u32, count: u32) -> OrderCommand {
		OrderCommand {
			side,
			order_id,
			price,
			count,
			instrument: "GOOG".to_string(),
		}
	}

	#[test]
	fn test_live_top_reaps_ended_entries() {
		let book = OrderBook::new();
		let liveness = Liveness::new();

		{
			let mut queue = book.lock_queue();
			queue.push(resting(Side::Buy, 1, 101, 10));
			queue.push(resting(Side::Buy, 2, 100, 20));
			let mut entries = liveness.lock();
			entries.insert(1, true);
			entries.insert(2, false);
		}

		let mut queue = book.lock_queue();
		let entries = liveness.lock();
		let top = OrderBook::live_top(&mut queue, &entries).unwrap();
		assert_eq!(top.order_id, 2);
		// The ended order was reaped, the live top stays in the heap
		assert_eq!(queue.len(), 1);
	}

	#[test]
	fn test_pop_top_if_live_loses_to_cancel() {
		let book = OrderBook::new();
		let liveness = Liveness::new();

		book.lock_queue().push(resting(Side::Sell, 1, 100, 10));
		liveness.lock().insert(1, true);

		let mut queue = book.lock_queue();
		let mut entries = liveness.lock();
		assert!(!OrderBook::pop_top_if_live(&mut queue, &mut entries));
		assert!(queue.is_empty());
	}

	#[test]
	fn test_pop_top_if_live_marks_ended() {
		let book = OrderBook::new();
		let liveness = Liveness::new();

		book.lock_queue().push(resting(Side::Sell, 1, 100, 10));
		liveness.lock().insert(1, false);

		let mut queue = book.lock_queue();
		let mut entries = liveness.lock();
		assert!(OrderBook::pop_top_if_live(&mut queue, &mut entries));
		assert!(Liveness::is_ended(&entries, 1));
	}

	#[test]
	fn test_replace_top_if_live_swaps_in_copy() {
		let book = OrderBook::new();
		let liveness = Liveness::new();

		let original = resting(Side::Sell, 1, 100, 10);
		book.lock_queue().push(original.clone());
		liveness.lock().insert(1, false);

		let mut queue = book.lock_queue();
		let entries = liveness.lock();
		let replacement = original.after_fill(4);
		assert!(OrderBook::replace_top_if_live(
			replacement,
			&mut queue,
			&entries
		));

		let top = queue.peek().unwrap();
		assert_eq!(top.order_id, 1);
		assert_eq!(top.count, 6);
		assert_eq!(top.execution_id, 1);
	}

	#[test]
	fn test_try_add_resting_refuses_crossing_top() {
		let buy_book = OrderBook::new();
		let sell_book = OrderBook::new();
		let liveness = Liveness::new();
		let (producer, consumer) = AuditBuffer::new(10).split();

		// A live sell at 90 crosses an incoming buy at 100
		sell_book.lock_queue().push(resting(Side::Sell, 1, 90, 10));
		liveness.lock().insert(1, false);

		let incoming = command(Side::Buy, 2, 100, 5);
		assert!(!OrderBook::try_add_resting(
			&incoming, &buy_book, &sell_book, &liveness, &producer
		));
		assert!(consumer.try_recv().is_err());
		assert!(buy_book.lock_queue().is_empty());
	}

	#[test]
	fn test_try_add_resting_publishes_and_registers() {
		let buy_book = OrderBook::new();
		let sell_book = OrderBook::new();
		let liveness = Liveness::new();
		let (producer, consumer) = AuditBuffer::new(10).split();

		// A non-crossing sell does not block the add
		sell_book.lock_queue().push(resting(Side::Sell, 1, 200, 10));
		liveness.lock().insert(1, false);

		let incoming = command(Side::Buy, 2, 100, 5);
		assert!(OrderBook::try_add_resting(
			&incoming, &buy_book, &sell_book, &liveness, &producer
		));

		assert_eq!(buy_book.lock_queue().len(), 1);
		assert!(!Liveness::is_ended(&liveness.lock(), 2));
		match consumer.recv().unwrap() {
			AuditEvent::OrderAdded {
				order_id,
				count,
				is_sell,
				..
			} => {
				assert_eq!(order_id, 2);
				assert_eq!(count, 5);
				assert!(!is_sell);
			}
			other => panic!("expected OrderAdded, got {:?}", other),
		}
	}

	#[test]
	fn test_try_add_resting_ignores_cancelled_crossing_top() {
		let buy_book = OrderBook::new();
		let sell_book = OrderBook::new();
		let liveness = Liveness::new();
		let (producer, _consumer) = AuditBuffer::new(10).split();

		// The crossing sell has been cancelled; only a stale entry remains
		sell_book.lock_queue().push(resting(Side::Sell, 1, 90, 10));
		liveness.lock().insert(1, true);

		let incoming = command(Side::Buy, 2, 100, 5);
		assert!(OrderBook::try_add_resting(
			&incoming, &buy_book, &sell_book, &liveness, &producer
		));
		// The stale sell entry was reaped during the joint-locked peek
		assert!(sell_book.lock_queue().is_empty());
	}
}
