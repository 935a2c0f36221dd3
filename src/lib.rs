// Copyright 2025 Chisomo Makombo Sakala
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

//! # Impabench
//!
//! `impabench` is the command-line front end of a micro-benchmark runner. It
//! turns process arguments into a validated [`config::Configuration`] and
//! dispatches to exactly one action: print help, list benchmarks, list
//! parameters, list reporters, or hand the configuration to a run engine.
//!
//! Benchmarks can be run over parameter sweeps described on the command line:
//!
//! ```text
//! impabench -p label:small -p size:*:1:2:8
//! ```
//!
//! runs every benchmark with `size` = 1, 2, 4, ..., 128 and `label` = small.
//!
//! ## Core Modules
//!
//! * [`catalog`]: The table of recognized options and the help text.
//! * [`matcher`]: Matches raw tokens against the catalog.
//! * [`values`]: Converts raw option values to their declared kinds.
//! * [`sweep`]: The `--param` grammar and the merging of sweeps.
//! * [`config`]: Binds and validates matched arguments into a `Configuration`.
//! * [`dispatch`]: Selects and runs the action, producing the exit code.
//! * [`registry`]: Benchmark, reporter and parameter registries.
//! * [`suite`]: Loads the suite manifest that fills the registries.
//! * [`engine`]: The `RunEngine` seam and the plan-writing engine.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod registry;
pub mod suite;
pub mod sweep;
pub mod values;
