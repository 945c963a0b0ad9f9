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

use std::io::{self, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};

use thiserror::Error;

use crate::types::{CancelRequest, ClientCommand, NewOrder, OrderId};
use crate::wire;

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("network error: {0}")]
	Io(#[from] io::Error),
	#[error("encoding error: {0}")]
	Wire(#[from] wire::WireError),
}

/// Client for a single session against the matching engine
///
/// This is a synchronous client: each submitted command is framed and
/// flushed before the call returns. The engine sends nothing back on the
/// session; outcomes are observable on the engine's audit stream.
pub struct Client {
	writer: BufWriter<TcpStream>,
}

impl Client {
	/// Open a session to the engine at the given address
	pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
		let stream = TcpStream::connect(addr)?;
		stream.set_nodelay(true)?;
		Ok(Self {
			writer: BufWriter::new(stream),
		})
	}

	/// Submit one command on this session
	pub fn submit(&mut self, command: &ClientCommand) -> Result<(), ClientError> {
		let line = wire::encode_line(command)?;
		self.writer.write_all(line.as_bytes())?;
		self.writer.write_all(b"\n")?;
		self.writer.flush()?;
		Ok(())
	}

	/// Submit a buy order
	pub fn buy(
		&mut self,
		order_id: OrderId,
		instrument: &str,
		price: u32,
		count: u32,
	) -> Result<(), ClientError> {
		self.submit(&ClientCommand::Buy(NewOrder {
			order_id,
			instrument: instrument.to_string(),
			price,
			count,
		}))
	}

	/// Submit a sell order
	pub fn sell(
		&mut self,
		order_id: OrderId,
		instrument: &str,
		price: u32,
		count: u32,
	) -> Result<(), ClientError> {
		self.submit(&ClientCommand::Sell(NewOrder {
			order_id,
			instrument: instrument.to_string(),
			price,
			count,
		}))
	}

	/// Cancel a previously submitted order
	pub fn cancel(&mut self, order_id: OrderId) -> Result<(), ClientError> {
		self.submit(&ClientCommand::Cancel(CancelRequest { order_id }))
	}

	/// End the session, signalling EOF to the engine's session worker
	pub fn shutdown(mut self) -> Result<(), ClientError> {
		self.writer.flush()?;
		self.writer.get_ref().shutdown(std::net::Shutdown::Write)?;
		Ok(())
	}
}
