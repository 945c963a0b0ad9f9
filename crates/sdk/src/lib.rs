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

//! Forge SDK - client library for the matching engine wire protocol
//!
//! This crate provides the command types spoken on a client session, the
//! line-frame codec, and a small synchronous TCP client for submitting
//! commands.
//!
//! The SDK is designed to be lightweight and embeddable:
//! - No background threads
//! - No runtime initialization
//! - No environment or configuration loading

pub mod client;
pub mod types;
pub mod wire;

pub use client::{Client, ClientError};
pub use types::*;
pub use wire::{WireError, decode_line, encode_line};
