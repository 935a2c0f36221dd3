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
use crate::config::Configuration;
use crate::config::filter_regex;
use crate::registry::Registries;
use crate::sweep::ParamMap;
use crate::sweep::merge_maps;
use anyhow::Context;
use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;

/// Executes a validated configuration.
pub trait RunEngine {
  fn run(&self, config: &Configuration) -> Result<()>;
}

/// One benchmark execution selected by a configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRun<'a> {
  pub benchmark: &'a str,
  pub parameters: ParamMap,
  pub samples: usize,
  pub resamples: usize,
  pub confidence_interval: f64,
  pub analysis: bool,
  pub reporter: &'a str,
  pub title: &'a str,
}

/// Resolves the runs a configuration selects and writes them out as JSON
/// lines, one object per benchmark and parameter assignment.
pub struct PlanEngine<'r> {
  registries: &'r Registries,
}

impl<'r> PlanEngine<'r> {
  pub fn new(registries: &'r Registries) -> Self {
    PlanEngine { registries }
  }

  /// Matching benchmarks in registry order, each crossed with every
  /// parameter assignment layered over the registered defaults.
  pub fn plan<'a>(&'a self, config: &'a Configuration) -> Result<Vec<PlannedRun<'a>>> {
    let filter = filter_regex(&config.filter)
      .with_context(|| format!("Invalid benchmark filter '{}'", config.filter))?;

    let defaults = self.registries.parameters.defaults();
    let assignments: Vec<ParamMap> = if config.params.is_empty() {
      vec![defaults.clone()]
    } else {
      config
        .params
        .iter()
        .map(|params| merge_maps(defaults, params))
        .collect()
    };

    let runs = self
      .registries
      .benchmarks
      .iter()
      .filter(|benchmark| filter.is_match(&benchmark.name))
      .flat_map(|benchmark| {
        assignments.iter().map(move |parameters| PlannedRun {
          benchmark: &benchmark.name,
          parameters: parameters.clone(),
          samples: config.samples,
          resamples: config.resamples,
          confidence_interval: config.confidence_interval,
          analysis: !config.no_analysis,
          reporter: &config.reporter,
          title: &config.title,
        })
      })
      .collect();

    Ok(runs)
  }
}

impl RunEngine for PlanEngine<'_> {
  fn run(&self, config: &Configuration) -> Result<()> {
    let runs = self.plan(config)?;
    if runs.is_empty() {
      tracing::warn!(filter = %config.filter, "No benchmarks matched the filter");
    }

    let mut writer: Box<dyn Write> = match &config.output {
      Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
        format!("Failed to create output file {}", path.display())
      })?)),
      None => Box::new(io::stdout().lock()),
    };

    for run in &runs {
      if config.verbose {
        tracing::info!(benchmark = run.benchmark, parameters = ?run.parameters, "Planned run");
      } else if !config.summary {
        tracing::debug!(benchmark = run.benchmark, parameters = ?run.parameters, "Planned run");
      }
      serde_json::to_writer(&mut writer, run).context("Failed to serialize planned run")?;
      writeln!(writer).context("Failed to write run plan")?;
    }
    writer.flush().context("Failed to write run plan")?;

    tracing::info!(runs = runs.len(), title = %config.title, "Run plan complete");
    Ok(())
  }
}
