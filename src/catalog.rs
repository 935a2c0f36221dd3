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
use crate::values::ValueKind;
use std::fmt::Write;

pub const HELP: &str = "help";
pub const SAMPLES: &str = "samples";
pub const RESAMPLES: &str = "resamples";
pub const CONFIDENCE_INTERVAL: &str = "confidence-interval";
pub const PARAM: &str = "param";
pub const OUTPUT: &str = "output";
pub const REPORTER: &str = "reporter";
pub const TITLE: &str = "title";
pub const NO_ANALYSIS: &str = "no-analysis";
pub const FILTER: &str = "filter";
pub const LIST: &str = "list";
pub const LIST_PARAMS: &str = "list-params";
pub const LIST_REPORTERS: &str = "list-reporters";
pub const VERBOSE: &str = "verbose";
pub const SUMMARY: &str = "summary";

/// A single recognized command-line option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDefinition {
  /// Long name, matched as `--name`. Unique within the catalog.
  pub name: &'static str,
  /// Short alias, matched as `-alias`. May be longer than one character.
  pub alias: Option<&'static str>,
  pub description: &'static str,
  /// Placeholder shown in the help text; present iff the option takes a value.
  pub placeholder: Option<&'static str>,
  pub kind: ValueKind,
}

impl OptionDefinition {
  const fn flag(name: &'static str, alias: &'static str, description: &'static str) -> Self {
    OptionDefinition {
      name,
      alias: Some(alias),
      description,
      placeholder: None,
      kind: ValueKind::Flag,
    }
  }

  const fn valued(
    name: &'static str,
    alias: &'static str,
    placeholder: &'static str,
    kind: ValueKind,
    description: &'static str,
  ) -> Self {
    OptionDefinition {
      name,
      alias: Some(alias),
      description,
      placeholder: Some(placeholder),
      kind,
    }
  }

  pub fn takes_value(&self) -> bool {
    self.placeholder.is_some()
  }

  /// Whether every occurrence is kept rather than only the last one.
  pub fn repeatable(&self) -> bool {
    self.kind == ValueKind::Sweep
  }

  /// The alias as a `char`, when it is exactly one character long.
  pub fn short(&self) -> Option<char> {
    let mut chars = self.alias?.chars();
    match (chars.next(), chars.next()) {
      (Some(c), None) => Some(c),
      _ => None,
    }
  }

  fn usage(&self) -> String {
    let mut usage = match self.alias {
      Some(alias) => format!("-{alias}, --{}", self.name),
      None => format!("--{}", self.name),
    };
    if let Some(placeholder) = self.placeholder {
      let _ = write!(usage, " <{placeholder}>");
    }
    usage
  }
}

/// Every option the command line understands, in binding order.
pub static CATALOG: &[OptionDefinition] = &[
  OptionDefinition::flag(HELP, "h", "show this help message"),
  OptionDefinition::valued(
    SAMPLES,
    "s",
    "SAMPLES",
    ValueKind::Integer,
    "number of samples to collect (default: 100)",
  ),
  OptionDefinition::valued(
    RESAMPLES,
    "rs",
    "RESAMPLES",
    ValueKind::Integer,
    "number of resamples for the bootstrap (default: 100000)",
  ),
  OptionDefinition::valued(
    CONFIDENCE_INTERVAL,
    "ci",
    "INTERVAL",
    ValueKind::Real,
    "confidence interval for the bootstrap, between 0 and 1 (default: 0.95)",
  ),
  OptionDefinition::valued(
    PARAM,
    "p",
    "PARAM",
    ValueKind::Sweep,
    "set a benchmark parameter as name:value or sweep it as name:op:init:delta:steps (repeatable)",
  ),
  OptionDefinition::valued(
    OUTPUT,
    "o",
    "FILE",
    ValueKind::Text,
    "output file (default: <stdout>)",
  ),
  OptionDefinition::valued(
    REPORTER,
    "r",
    "REPORTER",
    ValueKind::Text,
    "reporter to use (default: standard)",
  ),
  OptionDefinition::valued(
    TITLE,
    "t",
    "TITLE",
    ValueKind::Text,
    "set report title",
  ),
  OptionDefinition::flag(NO_ANALYSIS, "A", "perform only measurements; do not perform any analysis"),
  OptionDefinition::valued(
    FILTER,
    "f",
    "PATTERN",
    ValueKind::Text,
    "only run benchmarks whose name matches the regular expression PATTERN",
  ),
  OptionDefinition::flag(LIST, "l", "list benchmarks"),
  OptionDefinition::flag(LIST_PARAMS, "lp", "list available parameters"),
  OptionDefinition::flag(LIST_REPORTERS, "lr", "list available reporters"),
  OptionDefinition::flag(VERBOSE, "v", "show verbose output (mutually exclusive with -q)"),
  OptionDefinition::flag(SUMMARY, "q", "show summary output (mutually exclusive with -v)"),
];

/// Looks up an option by its long name.
pub fn find(name: &str) -> Option<&'static OptionDefinition> {
  CATALOG.iter().find(|def| def.name == name)
}

/// Looks up an option whose alias is longer than one character.
pub fn find_long_alias(alias: &str) -> Option<&'static OptionDefinition> {
  CATALOG
    .iter()
    .find(|def| def.short().is_none() && def.alias == Some(alias))
}

/// Renders the usage text for `program`.
pub fn help_text(program: &str) -> String {
  let rows: Vec<(String, &str)> = CATALOG
    .iter()
    .map(|def| (def.usage(), def.description))
    .collect();
  let width = rows.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);

  let mut text = format!("Usage: {program} [OPTIONS]\n\nOptions:\n");
  for (usage, description) in rows {
    let _ = writeln!(text, "  {usage:<width$}  {description}");
  }
  text
}
