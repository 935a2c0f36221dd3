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

//! The suite manifest: which benchmarks exist and which parameters they read.
//!
//! ```toml
//! [[benchmarks]]
//! name = "vector-push"
//!
//! [parameters]
//! size = 64
//! label = "small"
//! ```
//!
//! `IMPABENCH_PARAM_<NAME>` environment variables add or override parameter
//! defaults. Their text is kept as written; manifest numbers are listed in
//! their TOML/JSON form (`1.0` stays `1.0`).

use crate::error::SuiteError;
use crate::registry::Benchmark;
use crate::registry::BenchmarkRegistry;
use crate::registry::ParameterRegistry;
use crate::registry::Registries;
use crate::registry::ReporterRegistry;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Json;
use figment::providers::Toml;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Manifest read when `IMPABENCH_SUITE` is not set.
pub const DEFAULT_SUITE_FILE: &str = "impabench.toml";

/// Prefix of environment variables that set parameter defaults.
pub const PARAM_ENV_PREFIX: &str = "IMPABENCH_PARAM_";

/// A parameter default as written in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
  Flag(bool),
  Integer(i64),
  Real(f64),
  Text(String),
}

impl fmt::Display for DefaultValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DefaultValue::Flag(value) => write!(f, "{value}"),
      DefaultValue::Integer(value) => write!(f, "{value}"),
      DefaultValue::Real(value) => write!(f, "{value:?}"),
      DefaultValue::Text(value) => f.write_str(value),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteManifest {
  #[serde(default)]
  pub benchmarks: Vec<Benchmark>,

  #[serde(default)]
  pub parameters: BTreeMap<String, DefaultValue>,
}

impl SuiteManifest {
  /// Loads the manifest at `path` (TOML, or JSON for a `.json` extension)
  /// and layers parameter defaults from the environment on top.
  ///
  /// A missing file yields an empty suite.
  pub fn load(path: &Path) -> Result<Self, SuiteError> {
    if !path.exists() {
      tracing::warn!(path = %path.display(), "Suite manifest not found; no benchmarks registered");
    }

    let figment = match path.extension().and_then(|ext| ext.to_str()) {
      Some("json") => Figment::new().merge(Json::file(path)),
      _ => Figment::new().merge(Toml::file(path)),
    };

    let mut manifest: SuiteManifest = figment.extract().map_err(|source| SuiteError::Load {
      path: path.to_path_buf(),
      source: Box::new(source),
    })?;

    // raw text, so `007` is not read back as the integer 7
    for (key, value) in Env::prefixed(PARAM_ENV_PREFIX).iter() {
      let name = key.as_str().to_ascii_lowercase();
      tracing::debug!(%name, %value, "Parameter default from environment");
      manifest.parameters.insert(name, DefaultValue::Text(value));
    }

    if let Some(name) = first_duplicate(&manifest.benchmarks) {
      return Err(SuiteError::DuplicateBenchmark { name });
    }

    tracing::debug!(
      benchmarks = manifest.benchmarks.len(),
      parameters = manifest.parameters.len(),
      "Loaded suite manifest from {}",
      path.display()
    );
    Ok(manifest)
  }

  /// Builds the registries, with the built-in reporters.
  pub fn into_registries(self) -> Registries {
    let defaults = self
      .parameters
      .into_iter()
      .map(|(name, value)| (name, value.to_string()))
      .collect();

    Registries {
      benchmarks: BenchmarkRegistry::new(self.benchmarks),
      reporters: ReporterRegistry::builtin(),
      parameters: ParameterRegistry::new(defaults),
    }
  }
}

fn first_duplicate(benchmarks: &[Benchmark]) -> Option<String> {
  let mut seen = HashSet::new();
  benchmarks
    .iter()
    .find(|benchmark| !seen.insert(benchmark.name.as_str()))
    .map(|benchmark| benchmark.name.clone())
}
