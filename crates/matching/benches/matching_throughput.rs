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

use std::sync::Arc;
use std::thread;

use criterion::{Criterion, criterion_group, criterion_main};

use forge_matching::audit::AuditBuffer;
use forge_matching::engine::Engine;
use forge_sdk::types::{ClientCommand, NewOrder};

#[derive(Clone, Copy)]
enum Scenario {
	/// Wide spread, nothing ever crosses: pure add pressure
	NoCross,
	/// Everything at one price: every second order executes the previous
	CrossHeavy,
}

struct OrderGenerator {
	counter: u32,
	scenario: Scenario,
}

impl OrderGenerator {
	fn new(scenario: Scenario) -> Self {
		Self {
			counter: 0,
			scenario,
		}
	}

	fn next_order(&mut self) -> ClientCommand {
		self.counter += 1;
		let order_id = self.counter;

		match self.scenario {
			Scenario::NoCross => {
				let order = NewOrder {
					order_id,
					instrument: "BENCH".to_string(),
					price: if order_id.is_multiple_of(2) {
						44_000 + (order_id % 1000)
					} else {
						56_000 + (order_id % 1000)
					},
					count: 1,
				};
				if order_id.is_multiple_of(2) {
					ClientCommand::Buy(order)
				} else {
					ClientCommand::Sell(order)
				}
			}
			Scenario::CrossHeavy => {
				let order = NewOrder {
					order_id,
					instrument: "BENCH".to_string(),
					price: 50_000,
					count: 10,
				};
				if order_id.is_multiple_of(2) {
					ClientCommand::Buy(order)
				} else {
					ClientCommand::Sell(order)
				}
			}
		}
	}
}

fn run_scenario(c: &mut Criterion, name: &str, scenario: Scenario) {
	const ORDERS: usize = 10_000;

	c.bench_function(name, |b| {
		b.iter_batched(
			|| {
				let mut generator = OrderGenerator::new(scenario);
				let commands: Vec<ClientCommand> =
					(0..ORDERS).map(|_| generator.next_order()).collect();

				let (producer, consumer) = AuditBuffer::new(4096).split();
				// Discard events on a drainer thread so emission never
				// blocks the matching path
				let drainer = thread::spawn(move || while consumer.recv().is_ok() {});
				(Arc::new(Engine::new(producer)), commands, drainer)
			},
			|(engine, commands, drainer)| {
				for command in commands {
					engine.dispatch(command);
				}
				drop(engine);
				drainer.join().unwrap();
			},
			criterion::BatchSize::LargeInput,
		);
	});
}

fn matching_throughput(c: &mut Criterion) {
	run_scenario(c, "no_cross_10k", Scenario::NoCross);
	run_scenario(c, "cross_heavy_10k", Scenario::CrossHeavy);
}

criterion_group!(benches, matching_throughput);
criterion_main!(benches);
