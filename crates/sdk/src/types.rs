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

use serde::{Deserialize, Serialize};

/// Order identifier, assigned by the client and unique across its session
/// stream. Never reused once an order has ended.
pub type OrderId = u32;

/// Maximum length of an instrument symbol, in bytes (ASCII only).
pub const MAX_INSTRUMENT_LEN: usize = 8;

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
	Buy,
	Sell,
}

impl Side {
	pub fn is_sell(self) -> bool {
		matches!(self, Side::Sell)
	}
}

/// A new buy or sell order as submitted on the wire
///
/// `price` and `count` are positive integers; the codec rejects zero values
/// at decode time so the engine never sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
	/// Client-assigned order ID
	pub order_id: OrderId,
	/// Instrument symbol (ASCII, at most [`MAX_INSTRUMENT_LEN`] bytes)
	pub instrument: String,
	/// Limit price
	pub price: u32,
	/// Quantity
	pub count: u32,
}

/// Cancel request for a previously submitted order
///
/// Only the order ID is meaningful for a cancel; the engine resolves the
/// order through its process-wide liveness registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
	pub order_id: OrderId,
}

/// A single framed command on a client session
///
/// One command per line on the wire, tagged by `kind`:
///
/// ```json
/// {"kind":"buy","order_id":1,"instrument":"GOOG","price":100,"count":10}
/// {"kind":"sell","order_id":2,"instrument":"GOOG","price":105,"count":3}
/// {"kind":"cancel","order_id":1}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClientCommand {
	Buy(NewOrder),
	Sell(NewOrder),
	Cancel(CancelRequest),
}

impl ClientCommand {
	/// Get the order ID this command concerns
	pub fn order_id(&self) -> OrderId {
		match self {
			ClientCommand::Buy(order) | ClientCommand::Sell(order) => order.order_id,
			ClientCommand::Cancel(cancel) => cancel.order_id,
		}
	}

	/// Get the side of a buy/sell command (cancels have none)
	pub fn side(&self) -> Option<Side> {
		match self {
			ClientCommand::Buy(_) => Some(Side::Buy),
			ClientCommand::Sell(_) => Some(Side::Sell),
			ClientCommand::Cancel(_) => None,
		}
	}
}
