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

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use forge_sdk::types::OrderId;

use crate::audit::{AuditEvent, AuditProducer};
use crate::clock;

/// Process-wide order liveness registry
///
/// Maps every order that has ever rested to its terminal state:
/// `false` while the order is resting, `true` once it has ended (fully
/// executed or cancelled). Entries are never removed and ids are never
/// reused, which is what makes "ended" terminal.
///
/// Cancellation is lazy deletion: a cancel only flips the entry here, and
/// the books reap stale heap entries the next time they peek their top.
/// That keeps cancel O(1) and keeps the heap comparator independent of
/// liveness.
///
/// Lock ordering: this table's lock is acquired after any book queue lock
/// and released before it (or held alone, as in [`cancel`]). No code path
/// holds this lock while acquiring a queue lock.
///
/// [`cancel`]: Liveness::cancel
pub struct Liveness {
	entries: Mutex<HashMap<OrderId, bool>>,
}

impl Liveness {
	pub fn new() -> Self {
		Self {
			entries: Mutex::new(HashMap::new()),
		}
	}

	/// Lock the registry
	///
	/// Callers pass the guard down into the book primitives so the locking
	/// discipline is visible in every signature that relies on it.
	pub fn lock(&self) -> MutexGuard<'_, HashMap<OrderId, bool>> {
		self.entries.lock().expect("liveness table mutex poisoned")
	}

	/// Whether the given id has already ended
	///
	/// Absent ids are treated as live: every resting order is registered
	/// under the same lock that admitted it to its book.
	pub fn is_ended(entries: &HashMap<OrderId, bool>, order_id: OrderId) -> bool {
		entries.get(&order_id).copied().unwrap_or(false)
	}

	/// Cancel an order
	///
	/// Takes the registry lock alone. A cancel succeeds iff the id is
	/// registered and not yet ended; either way an `OrderDeleted` event is
	/// emitted, with the outcome carried in its `accepted` flag. Emission
	/// happens under the guard so the terminal event cannot race a
	/// concurrent fill of the same id.
	pub fn cancel(&self, order_id: OrderId, audit: &AuditProducer) {
		let mut entries = self.lock();
		let accepted = match entries.get(&order_id) {
			Some(false) => {
				entries.insert(order_id, true);
				true
			}
			_ => false,
		};
		audit.emit(AuditEvent::OrderDeleted {
			order_id,
			accepted,
			timestamp: clock::timestamp_ns(),
		});
	}
}

impl Default for Liveness {
	fn default() -> Self {
		Self::new()
	}
}
