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

use std::cmp::Ordering;

use forge_sdk::types::{OrderId, Side};

use crate::clock;
use crate::types::OrderCommand;

/// A resting order on one side of an instrument's book
///
/// Orders are treated as values: a partial fill that keeps the order at the
/// top of its book is modeled as pop + push of an [`after_fill`] copy rather
/// than in-place mutation. The comparator fields (side, price, timestamp)
/// never change across copies of the same order ID.
///
/// [`after_fill`]: Order::after_fill
#[derive(Debug, Clone)]
pub struct Order {
	pub side: Side,
	pub order_id: OrderId,
	pub price: u32,
	pub count: u32,
	pub instrument: String,
	/// Per-order fill counter, starts at 0 on rest and increments with every
	/// partial fill this order is party to
	pub execution_id: u32,
	/// Monotonic nanoseconds at the moment of resting
	pub timestamp: u64,
}

impl Order {
	/// Create a resting order from an incoming command, capturing a fresh
	/// timestamp
	pub fn from_command(command: &OrderCommand) -> Self {
		Self {
			side: command.side,
			order_id: command.order_id,
			price: command.price,
			count: command.count,
			instrument: command.instrument.clone(),
			execution_id: 0,
			timestamp: clock::timestamp_ns(),
		}
	}

	/// Whether this resting order crosses the incoming command
	///
	/// Same-side orders never cross. A resting buy crosses an incoming sell
	/// priced at or below it; a resting sell crosses an incoming buy priced
	/// at or above it.
	pub fn crosses(&self, command: &OrderCommand) -> bool {
		if self.side == command.side {
			return false;
		}
		match self.side {
			Side::Buy => self.price >= command.price,
			Side::Sell => self.price <= command.price,
		}
	}

	/// Copy of this order after a partial fill of `quantity` units
	///
	/// Price and timestamp are untouched so the copy keeps its queue
	/// position; only the remaining count and the fill counter move.
	pub fn after_fill(&self, quantity: u32) -> Self {
		let mut updated = self.clone();
		updated.count -= quantity;
		updated.execution_id += 1;
		updated
	}
}

/// Price-time priority: the heap top is the best-priced order, ties broken
/// by earliest timestamp. Each book holds a single side, so the comparator
/// branches on the side of `self`.
impl Ord for Order {
	fn cmp(&self, other: &Self) -> Ordering {
		let by_price = match self.side {
			Side::Buy => self.price.cmp(&other.price),
			Side::Sell => other.price.cmp(&self.price),
		};
		by_price.then_with(|| other.timestamp.cmp(&self.timestamp))
	}
}

impl PartialOrd for Order {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Order {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Order {}
