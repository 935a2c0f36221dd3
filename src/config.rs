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
use crate::catalog::*;
use crate::error::ArgumentError;
use crate::error::ConversionError;
use crate::matcher::ParsedArguments;
use crate::matcher::match_arguments;
use crate::registry::Registries;
use crate::sweep::ParamSweep;
use crate::values::Value;
use crate::values::ValueError;
use regex::Regex;
use std::path::PathBuf;

// --- Default Values ---
pub const DEFAULT_SAMPLES: usize = 100;
pub const DEFAULT_RESAMPLES: usize = 100_000;
pub const DEFAULT_CONFIDENCE_INTERVAL: f64 = 0.95;
pub const DEFAULT_REPORTER: &str = "standard";
pub const DEFAULT_FILTER: &str = ".*";
pub const DEFAULT_TITLE: &str = "benchmarks";

/// Fully validated run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
  pub help: bool,
  pub no_analysis: bool,
  pub list_benchmarks: bool,
  pub list_params: bool,
  pub list_reporters: bool,
  pub verbose: bool,
  pub summary: bool,
  pub samples: usize,
  pub resamples: usize,
  pub confidence_interval: f64,
  /// Where results go; `None` means standard output.
  pub output: Option<PathBuf>,
  pub reporter: String,
  pub filter: String,
  pub title: String,
  /// Parameter assignments to run with; empty when no `--param` was given.
  pub params: ParamSweep,
}

impl Default for Configuration {
  fn default() -> Self {
    Configuration {
      help: false,
      no_analysis: false,
      list_benchmarks: false,
      list_params: false,
      list_reporters: false,
      verbose: false,
      summary: false,
      samples: DEFAULT_SAMPLES,
      resamples: DEFAULT_RESAMPLES,
      confidence_interval: DEFAULT_CONFIDENCE_INTERVAL,
      output: None,
      reporter: DEFAULT_REPORTER.to_string(),
      filter: DEFAULT_FILTER.to_string(),
      title: DEFAULT_TITLE.to_string(),
      params: ParamSweep::default(),
    }
  }
}

impl Configuration {
  /// Matches and binds raw command-line tokens (program name excluded).
  pub fn parse<I, S>(args: I, registries: &Registries) -> Result<Self, ArgumentError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let parsed = match_arguments(args)?;
    Self::bind(&parsed, registries)
  }

  /// Binds matched arguments field by field, stopping at the first invalid one.
  pub fn bind(parsed: &ParsedArguments, registries: &Registries) -> Result<Self, ArgumentError> {
    let mut config = Configuration::default();

    for def in CATALOG {
      let Some(raw_values) = parsed.get(def.name) else {
        continue;
      };

      for raw in raw_values {
        let value = def.kind.parse(raw).map_err(|error| match error {
          ValueError::Conversion(ConversionError { expected, .. }) => ArgumentError::Conversion {
            option: def.name,
            value: raw.clone(),
            expected,
          },
          ValueError::Sweep(error) => ArgumentError::Validation {
            option: def.name,
            value: raw.clone(),
            reason: error.to_string(),
          },
        })?;

        config
          .assign(def.name, value, registries)
          .map_err(|reason| ArgumentError::Validation {
            option: def.name,
            value: raw.clone(),
            reason,
          })?;
      }
    }

    if config.verbose && config.summary {
      return Err(ArgumentError::MutualExclusion {
        first: VERBOSE,
        second: SUMMARY,
      });
    }

    tracing::debug!(?config, "Bound configuration");
    Ok(config)
  }

  fn assign(&mut self, option: &str, value: Value, registries: &Registries) -> Result<(), String> {
    match (option, value) {
      (HELP, Value::Flag(set)) => self.help = set,
      (NO_ANALYSIS, Value::Flag(set)) => self.no_analysis = set,
      (LIST, Value::Flag(set)) => self.list_benchmarks = set,
      (LIST_PARAMS, Value::Flag(set)) => self.list_params = set,
      (LIST_REPORTERS, Value::Flag(set)) => self.list_reporters = set,
      (VERBOSE, Value::Flag(set)) => self.verbose = set,
      (SUMMARY, Value::Flag(set)) => self.summary = set,
      (SAMPLES, Value::Integer(count)) => self.samples = positive(count)?,
      (RESAMPLES, Value::Integer(count)) => self.resamples = positive(count)?,
      (CONFIDENCE_INTERVAL, Value::Real(interval)) => {
        if !(interval > 0.0 && interval < 1.0) {
          return Err("must lie strictly between 0 and 1".to_string());
        }
        self.confidence_interval = interval;
      }
      (PARAM, Value::Sweep(sweep)) => {
        if sweep.is_empty() {
          return Err("no parameter values".to_string());
        }
        if let Some(unknown) = sweep
          .keys()
          .find(|name| !registries.parameters.contains(name))
        {
          return Err(format!("unknown parameter '{unknown}'"));
        }
        self.params = if self.params.is_empty() {
          sweep
        } else {
          std::mem::take(&mut self.params)
            .merge(sweep)
            .map_err(|error| error.to_string())?
        };
      }
      (OUTPUT, Value::Text(path)) => {
        if path.is_empty() {
          return Err("output path is empty".to_string());
        }
        self.output = Some(PathBuf::from(path));
      }
      (REPORTER, Value::Text(name)) => {
        if !registries.reporters.contains(&name) {
          return Err(format!("unknown reporter '{name}'"));
        }
        self.reporter = name;
      }
      (TITLE, Value::Text(title)) => self.title = title,
      (FILTER, Value::Text(pattern)) => {
        filter_regex(&pattern).map_err(|error| error.to_string())?;
        self.filter = pattern;
      }
      (option, value) => return Err(format!("--{option} cannot hold {value:?}")),
    }
    Ok(())
  }
}

/// Compiles a benchmark filter so that it must match a whole name.
pub fn filter_regex(pattern: &str) -> Result<Regex, regex::Error> {
  Regex::new(&format!("^(?:{pattern})$"))
}

fn positive(count: i64) -> Result<usize, String> {
  usize::try_from(count)
    .ok()
    .filter(|count| *count > 0)
    .ok_or_else(|| "must be a positive integer".to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::ParameterRegistry;
  use crate::registry::ReporterRegistry;
  use crate::sweep::ParamMap;
  use std::collections::BTreeMap;

  fn registries() -> Registries {
    let defaults: BTreeMap<String, String> = [("x", "1"), ("n", "10"), ("a", "0"), ("b", "0")]
      .into_iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    Registries {
      reporters: ReporterRegistry::builtin(),
      parameters: ParameterRegistry::new(defaults),
      ..Registries::default()
    }
  }

  fn parse(args: &[&str]) -> Result<Configuration, ArgumentError> {
    Configuration::parse(args.iter().copied(), &registries())
  }

  fn sweep(maps: &[&[(&str, &str)]]) -> ParamSweep {
    maps
      .iter()
      .map(|pairs| {
        pairs
          .iter()
          .map(|(k, v)| (k.to_string(), v.to_string()))
          .collect::<ParamMap>()
      })
      .collect::<Vec<_>>()
      .into()
  }

  #[test]
  fn defaults() {
    let config = parse(&[]).unwrap();
    assert_eq!(config, Configuration::default());
    assert_eq!(config.samples, 100);
    assert_eq!(config.resamples, 100_000);
    assert_eq!(config.confidence_interval, 0.95);
    assert_eq!(config.reporter, "standard");
    assert!(config.params.is_empty());
  }

  #[test]
  fn samples_must_be_positive_integers() {
    for n in ["1", "7", "100000"] {
      assert_eq!(parse(&["-s", n]).unwrap().samples, n.parse::<usize>().unwrap());
    }
    assert!(matches!(
      parse(&["-s", "-1"]),
      Err(ArgumentError::Validation { option: SAMPLES, .. })
    ));
    assert!(matches!(
      parse(&["-s", "0"]),
      Err(ArgumentError::Validation { option: SAMPLES, .. })
    ));
    assert!(matches!(
      parse(&["-s", "abc"]),
      Err(ArgumentError::Conversion { option: SAMPLES, .. })
    ));
    assert_eq!(parse(&["-rs", "250"]).unwrap().resamples, 250);
    assert!(matches!(
      parse(&["-rs", "0"]),
      Err(ArgumentError::Validation { option: RESAMPLES, .. })
    ));
  }

  #[test]
  fn confidence_interval_is_an_open_interval() {
    for c in ["0.5", "0.01", "0.999"] {
      assert_eq!(
        parse(&["-ci", c]).unwrap().confidence_interval,
        c.parse::<f64>().unwrap()
      );
    }
    for c in ["0", "1", "-0.5", "1.5", "NaN"] {
      assert!(parse(&["-ci", c]).is_err(), "{c}");
    }
    assert!(matches!(
      parse(&["-ci", "high"]),
      Err(ArgumentError::Conversion { .. })
    ));
  }

  #[test]
  fn fixed_param() {
    assert_eq!(parse(&["-p", "x:5"]).unwrap().params, sweep(&[&[("x", "5")]]));
    assert!(matches!(
      parse(&["-p", "y:5"]),
      Err(ArgumentError::Validation { option: PARAM, .. })
    ));
  }

  #[test]
  fn swept_params() {
    assert_eq!(
      parse(&["-p", "n:+:0:2:3"]).unwrap().params,
      sweep(&[&[("n", "0")], &[("n", "2")], &[("n", "4")]])
    );
    assert_eq!(
      parse(&["-p", "n:*:1:2:4"]).unwrap().params,
      sweep(&[&[("n", "1")], &[("n", "2")], &[("n", "4")], &[("n", "8")]])
    );
  }

  #[test]
  fn fixed_param_broadcasts_into_sweep() {
    assert_eq!(
      parse(&["-p", "a:1", "-p", "b:+:0:1:3"]).unwrap().params,
      sweep(&[
        &[("a", "1"), ("b", "0")],
        &[("a", "1"), ("b", "1")],
        &[("a", "1"), ("b", "2")],
      ])
    );
    assert_eq!(
      parse(&["-p", "b:+:0:1:2", "-p", "a:1", "-p", "x:3"]).unwrap().params,
      sweep(&[
        &[("a", "1"), ("b", "0"), ("x", "3")],
        &[("a", "1"), ("b", "1"), ("x", "3")],
      ])
    );
  }

  #[test]
  fn invalid_params() {
    for args in [
      &["-p", "a:b:c"][..],
      &["-p", "n:/:1:2:3"][..],
      &["-p", "n:+:0:1:0"][..],
      &["-p", "n:+:x:1:3"][..],
      &["-p", "a:+:0:1:2", "-p", "b:+:0:1:3"][..],
      &["-p", "n:+:0:1:2000000"][..],
    ] {
      assert!(
        matches!(parse(args), Err(ArgumentError::Validation { option: PARAM, .. })),
        "{args:?}"
      );
    }
  }

  #[test]
  fn reporter_must_be_registered() {
    assert_eq!(parse(&["-r", "csv"]).unwrap().reporter, "csv");
    assert!(matches!(
      parse(&["-r", "nonexistent"]),
      Err(ArgumentError::Validation { option: REPORTER, .. })
    ));
  }

  #[test]
  fn filter_must_compile() {
    assert_eq!(parse(&["-f", "^vec"]).unwrap().filter, "^vec");
    assert!(matches!(
      parse(&["-f", "(unclosed"]),
      Err(ArgumentError::Validation { option: FILTER, .. })
    ));
    // a trailing comment would swallow the anchoring group
    assert!(matches!(
      parse(&["-f", "(?x)fib # note"]),
      Err(ArgumentError::Validation { option: FILTER, .. })
    ));
    let filter = filter_regex(&parse(&["-f", "(?x) vec .*"]).unwrap().filter).unwrap();
    assert!(filter.is_match("vector-push"));
    assert!(!filter.is_match("map-vector"));
  }

  #[test]
  fn text_fields() {
    let config = parse(&["-o", "out.json", "-t", "Nightly", "-A", "-l"]).unwrap();
    assert_eq!(config.output, Some(PathBuf::from("out.json")));
    assert_eq!(config.title, "Nightly");
    assert!(config.no_analysis);
    assert!(config.list_benchmarks);
    assert!(matches!(
      parse(&["-o", ""]),
      Err(ArgumentError::Validation { option: OUTPUT, .. })
    ));
  }

  #[test]
  fn verbose_and_summary_are_exclusive() {
    assert!(parse(&["-v"]).unwrap().verbose);
    assert!(parse(&["-q"]).unwrap().summary);
    for args in [
      &["-v", "-q"][..],
      &["-vq"][..],
      &["-l", "--summary", "-s", "5", "--verbose"][..],
    ] {
      assert!(
        matches!(parse(args), Err(ArgumentError::MutualExclusion { .. })),
        "{args:?}"
      );
    }
  }

  #[test]
  fn first_invalid_field_aborts() {
    // samples is bound before reporter
    assert!(matches!(
      parse(&["-r", "nonexistent", "-s", "abc"]),
      Err(ArgumentError::Conversion { option: SAMPLES, .. })
    ));
  }

  #[test]
  fn parsing_is_idempotent() {
    let args = ["-s", "20", "-ci", "0.9", "-p", "x:2", "-p", "n:+:1:1:4", "-r", "html", "-v"];
    assert_eq!(parse(&args).unwrap(), parse(&args).unwrap());
  }
}
