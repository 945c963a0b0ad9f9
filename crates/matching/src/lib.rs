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

//! Forge Matching Engine
//!
//! This crate provides a concurrent price-time-priority matching engine.
//! Client sessions submit buy, sell and cancel commands; the engine matches
//! crossing orders against per-instrument books and emits a totally ordered
//! audit stream of added/executed/deleted events.
//!
//! Architecture:
//! - One worker thread per client session, all sharing the engine router
//! - Per-instrument book pairs guarded by per-side queue locks
//! - A process-wide liveness table governing cancels and at-most-once
//!   execution (lazy deletion of cancelled heap entries)
//! - MPSC audit buffer drained by a background writer thread

pub mod audit;
pub mod book;
pub mod clock;
pub mod config;
pub mod engine;
pub mod instrument;
pub mod liveness;
pub mod logging;
pub mod order;
pub mod server;
pub mod session;
pub mod types;

pub use audit::{
	AuditBuffer, AuditConsumer, AuditEvent, AuditProducer, AuditSink, AuditWriter,
	AuditWriterConfig, JsonLineSink, MemoryAuditSink,
};
pub use book::OrderBook;
pub use config::MatchingConfig;
pub use engine::Engine;
pub use instrument::InstrumentOrders;
pub use liveness::Liveness;
pub use order::Order;
pub use types::OrderCommand;
