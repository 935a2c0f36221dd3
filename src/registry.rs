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

//! Read-only lookup tables consulted while parsing and dispatching.
//!
//! The registries are built once at startup (see [`crate::suite`]) and passed
//! by reference; nothing in the crate mutates them afterwards.

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// A registered benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmark {
  pub name: String,
}

/// Benchmarks in registration order.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRegistry {
  benchmarks: Vec<Benchmark>,
}

impl BenchmarkRegistry {
  pub fn new(benchmarks: Vec<Benchmark>) -> Self {
    BenchmarkRegistry { benchmarks }
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Benchmark> {
    self.benchmarks.iter()
  }

  pub fn len(&self) -> usize {
    self.benchmarks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.benchmarks.is_empty()
  }
}

/// Something that can render benchmark results. Rendering itself lives
/// outside this crate; the front end only needs to name and describe it.
pub trait Reporter {
  fn description(&self) -> &str;
}

/// A reporter known only by its description.
#[derive(Debug, Clone)]
pub struct NamedReporter {
  description: String,
}

impl NamedReporter {
  pub fn new(description: impl Into<String>) -> Self {
    NamedReporter {
      description: description.into(),
    }
  }
}

impl Reporter for NamedReporter {
  fn description(&self) -> &str {
    &self.description
  }
}

/// Reporters keyed by name.
#[derive(Default)]
pub struct ReporterRegistry {
  reporters: BTreeMap<String, Box<dyn Reporter>>,
}

impl ReporterRegistry {
  /// The reporters every installation ships with.
  pub fn builtin() -> Self {
    let mut registry = ReporterRegistry::default();
    registry.register("standard", NamedReporter::new("Standard output reporter"));
    registry.register("csv", NamedReporter::new("Raw CSV reporter"));
    registry.register("junit", NamedReporter::new("JUnit-style XML reporter"));
    registry.register("html", NamedReporter::new("HTML chart reporter"));
    registry
  }

  pub fn register(&mut self, name: impl Into<String>, reporter: impl Reporter + 'static) {
    self.reporters.insert(name.into(), Box::new(reporter));
  }

  pub fn get(&self, name: &str) -> Option<&dyn Reporter> {
    self.reporters.get(name).map(|reporter| reporter.as_ref())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.reporters.contains_key(name)
  }

  /// Reporters sorted by name.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Reporter)> {
    self
      .reporters
      .iter()
      .map(|(name, reporter)| (name.as_str(), reporter.as_ref()))
  }
}

/// Default values of the parameters benchmarks may read, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterRegistry {
  defaults: BTreeMap<String, String>,
}

impl ParameterRegistry {
  pub fn new(defaults: BTreeMap<String, String>) -> Self {
    ParameterRegistry { defaults }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.defaults.contains_key(name)
  }

  pub fn defaults(&self) -> &BTreeMap<String, String> {
    &self.defaults
  }
}

/// Every registry the front end consults, bundled for passing around.
#[derive(Default)]
pub struct Registries {
  pub benchmarks: BenchmarkRegistry,
  pub reporters: ReporterRegistry,
  pub parameters: ParameterRegistry,
}
