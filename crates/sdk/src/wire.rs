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

//! Line-frame codec for client sessions
//!
//! A session is a newline-delimited stream of JSON-encoded
//! [`ClientCommand`] records. Decoding validates the protocol constraints
//! that the matching core relies on: a non-empty ASCII instrument of at most
//! [`MAX_INSTRUMENT_LEN`] bytes and strictly positive price and count.
//! Any violation is a framing error and terminates the session.

use thiserror::Error;

use crate::types::{ClientCommand, MAX_INSTRUMENT_LEN, NewOrder};

/// Error types for frame encoding and decoding
#[derive(Debug, Error)]
pub enum WireError {
	#[error("malformed command frame: {0}")]
	Malformed(#[from] serde_json::Error),
	#[error("instrument symbol is empty")]
	EmptyInstrument,
	#[error("instrument symbol `{0}` exceeds {MAX_INSTRUMENT_LEN} bytes")]
	InstrumentTooLong(String),
	#[error("instrument symbol `{0}` contains non-ASCII bytes")]
	InstrumentNotAscii(String),
	#[error("order {0} has zero price")]
	ZeroPrice(u32),
	#[error("order {0} has zero count")]
	ZeroCount(u32),
}

/// Decode one frame (a single line, without the trailing newline)
///
/// Unknown `kind` tags and missing fields surface as [`WireError::Malformed`]
/// through serde.
pub fn decode_line(line: &str) -> Result<ClientCommand, WireError> {
	let command: ClientCommand = serde_json::from_str(line)?;

	match &command {
		ClientCommand::Buy(order) | ClientCommand::Sell(order) => validate_order(order)?,
		ClientCommand::Cancel(_) => {}
	}

	Ok(command)
}

/// Encode one command as a single frame (no trailing newline)
pub fn encode_line(command: &ClientCommand) -> Result<String, WireError> {
	Ok(serde_json::to_string(command)?)
}

fn validate_order(order: &NewOrder) -> Result<(), WireError> {
	if order.instrument.is_empty() {
		return Err(WireError::EmptyInstrument);
	}
	if order.instrument.len() > MAX_INSTRUMENT_LEN {
		return Err(WireError::InstrumentTooLong(order.instrument.clone()));
	}
	if !order.instrument.is_ascii() {
		return Err(WireError::InstrumentNotAscii(order.instrument.clone()));
	}
	if order.price == 0 {
		return Err(WireError::ZeroPrice(order.order_id));
	}
	if order.count == 0 {
		return Err(WireError::ZeroCount(order.order_id));
	}
	Ok(())
}
