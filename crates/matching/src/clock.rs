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

use std::sync::OnceLock;
use std::time::Instant;

static PROCESS_EPOCH: OnceLock<Instant> = OnceLock::new();

/// Monotonic nanoseconds since the process epoch
///
/// The epoch is pinned on first use. All audit timestamps and resting-order
/// timestamps come from this clock; it never goes backwards, which is what
/// makes timestamp ties in the priority comparator well defined.
pub fn timestamp_ns() -> u64 {
	PROCESS_EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}
