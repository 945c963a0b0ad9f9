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

use forge_sdk::types::{NewOrder, OrderId, Side};

/// A buy or sell command inside the matching core
///
/// This is the decoded, validated form of a wire [`forge_sdk::ClientCommand`]
/// buy/sell frame. `count` is mutable state: the match loop decrements it as
/// the incoming order consumes resting orders, and whatever remains when the
/// loop rests the order becomes the resting quantity.
#[derive(Debug, Clone)]
pub struct OrderCommand {
	/// Order side
	pub side: Side,
	/// Client-assigned order ID
	pub order_id: OrderId,
	/// Limit price
	pub price: u32,
	/// Remaining quantity
	pub count: u32,
	/// Instrument symbol
	pub instrument: String,
}

impl OrderCommand {
	pub fn new(side: Side, order: NewOrder) -> Self {
		Self {
			side,
			order_id: order.order_id,
			price: order.price,
			count: order.count,
			instrument: order.instrument,
		}
	}
}
