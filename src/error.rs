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
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning the command line into a `Configuration`.
///
/// Every variant is reported the same way at the dispatch boundary: the help
/// text is printed and the process exits with the argument error code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentError {
  #[error("Unrecognized option: {option}")]
  UnrecognizedOption { option: String },

  #[error("Missing value for option: {option}")]
  MissingValue { option: String },

  #[error("Invalid value '{value}' for --{option}: expected {expected}")]
  Conversion {
    option: &'static str,
    value: String,
    expected: &'static str,
  },

  #[error("Invalid value '{value}' for --{option}: {reason}")]
  Validation {
    option: &'static str,
    value: String,
    reason: String,
  },

  #[error("--{first} and --{second} cannot be used together")]
  MutualExclusion {
    first: &'static str,
    second: &'static str,
  },
}

/// A raw string that does not parse as the declared value kind.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("'{value}' is not {expected}")]
pub struct ConversionError {
  pub value: String,
  pub expected: &'static str,
}

/// Errors from the `--param` descriptor grammar and the sweep merger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
  #[error("expected 'name:value' or 'name:op:init:delta:steps', got {fields} field(s)")]
  Arity { fields: usize },

  #[error("unknown progression operator '{0}' (expected '+' or '*')")]
  UnknownOperator(String),

  #[error("{field} '{value}' is not a valid integer")]
  InvalidNumber { field: &'static str, value: String },

  #[error("a sweep needs at least one step")]
  Empty,

  #[error("{steps} steps exceeds the limit of {limit}")]
  TooManySteps { steps: usize, limit: usize },

  #[error("value overflows a 64-bit integer at step {step}")]
  Overflow { step: usize },

  #[error(
    "only one parameter may vary at a time (sweeps of {existing} and {incoming} values cannot be combined)"
  )]
  TwoVaryingAxes { existing: usize, incoming: usize },
}

/// Errors related to loading the suite manifest (src/suite.rs).
#[derive(Error, Debug)]
pub enum SuiteError {
  #[error("Failed to load suite manifest: {path}")]
  Load {
    path: PathBuf,
    #[source]
    source: Box<figment::Error>,
  },

  #[error("Duplicate benchmark name in suite manifest: {name}")]
  DuplicateBenchmark { name: String },
}

/// A failure surfaced by the run engine, caught at the dispatch boundary.
#[derive(Error, Debug)]
pub enum RunFailure {
  #[error("Run engine failed: {0:#}")]
  Error(anyhow::Error),

  #[error("Run engine panicked")]
  Panic(Option<String>),
}

impl RunFailure {
  /// The textual detail carried by the failure, if there is one.
  pub fn detail(&self) -> Option<String> {
    match self {
      RunFailure::Error(error) => {
        let message = format!("{error:#}");
        (!message.is_empty()).then_some(message)
      }
      RunFailure::Panic(message) => message.clone(),
    }
  }
}
