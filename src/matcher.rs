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
use crate::catalog::CATALOG;
use crate::catalog::OptionDefinition;
use crate::catalog::find;
use crate::catalog::find_long_alias;
use crate::error::ArgumentError;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap::error::ContextKind;
use clap::error::ContextValue;
use clap::error::ErrorKind;
use std::collections::BTreeMap;

/// Raw option values keyed by long option name.
///
/// Valueless flags that were present hold a single empty string. Options
/// other than `param` hold only their last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
  values: BTreeMap<&'static str, Vec<String>>,
}

impl ParsedArguments {
  /// Every raw value recorded for `name`, in encounter order.
  pub fn get(&self, name: &str) -> Option<&[String]> {
    self.values.get(name).map(Vec::as_slice)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }
}

/// Matches raw tokens (without the program name) against the option catalog.
pub fn match_arguments<I, S>(tokens: I) -> Result<ParsedArguments, ArgumentError>
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  let tokens = normalize(tokens.into_iter().map(Into::into));
  tracing::debug!(?tokens, "Matching command-line tokens");

  let matches = command().try_get_matches_from(tokens).map_err(classify)?;

  let mut parsed = ParsedArguments::default();
  for def in CATALOG {
    if def.takes_value() {
      if let Some(values) = matches.get_many::<String>(def.name) {
        parsed.values.insert(def.name, values.cloned().collect());
      }
    } else if matches.get_flag(def.name) {
      parsed.values.insert(def.name, vec![String::new()]);
    }
  }

  Ok(parsed)
}

fn command() -> Command {
  Command::new(env!("CARGO_PKG_NAME"))
    .no_binary_name(true)
    .disable_help_flag(true)
    .disable_version_flag(true)
    .args_override_self(true)
    .args(CATALOG.iter().map(to_arg))
}

fn to_arg(def: &OptionDefinition) -> Arg {
  let mut arg = Arg::new(def.name).long(def.name);
  if let Some(short) = def.short() {
    arg = arg.short(short);
  }

  match def.placeholder {
    Some(placeholder) => arg
      .value_name(placeholder)
      .num_args(1)
      .allow_hyphen_values(true)
      .action(if def.repeatable() {
        ArgAction::Append
      } else {
        ArgAction::Set
      }),
    None => arg.action(ArgAction::SetTrue),
  }
}

fn classify(error: clap::Error) -> ArgumentError {
  let option = match error.get(ContextKind::InvalidArg) {
    Some(ContextValue::String(option)) => option.clone(),
    _ => String::new(),
  };

  match error.kind() {
    ErrorKind::InvalidValue | ErrorKind::NoEquals | ErrorKind::TooFewValues => {
      ArgumentError::MissingValue { option }
    }
    _ => ArgumentError::UnrecognizedOption { option },
  }
}

/// Rewrites multi-character aliases (`-ci`, `-lp`, ...) to their long form.
///
/// A token that is the pending value of the previous option is left alone.
fn normalize(tokens: impl Iterator<Item = String>) -> Vec<String> {
  let mut normalized = Vec::new();
  let mut pending_value = false;

  for token in tokens {
    if pending_value {
      pending_value = false;
      normalized.push(token);
      continue;
    }

    let token = long_alias_form(&token).unwrap_or(token);
    pending_value = awaits_value(&token);
    normalized.push(token);
  }

  normalized
}

fn long_alias_form(token: &str) -> Option<String> {
  let body = token.strip_prefix('-').filter(|body| !body.starts_with('-'))?;
  let (alias, value) = match body.split_once('=') {
    Some((alias, value)) => (alias, Some(value)),
    None => (body, None),
  };
  let def = find_long_alias(alias)?;

  Some(match value {
    Some(value) => format!("--{}={value}", def.name),
    None => format!("--{}", def.name),
  })
}

/// Whether `token` is a value-taking option whose value is the next token.
fn awaits_value(token: &str) -> bool {
  if let Some(long) = token.strip_prefix("--") {
    return !long.contains('=') && find(long).is_some_and(OptionDefinition::takes_value);
  }

  let Some(shorts) = token.strip_prefix('-') else {
    return false;
  };
  for (index, c) in shorts.char_indices() {
    match CATALOG.iter().find(|def| def.short() == Some(c)) {
      Some(def) if def.takes_value() => return index + c.len_utf8() == shorts.len(),
      Some(_) => continue,
      None => return false,
    }
  }
  false
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::*;

  fn values<'a>(parsed: &'a ParsedArguments, name: &str) -> Vec<&'a str> {
    parsed
      .get(name)
      .unwrap_or_default()
      .iter()
      .map(String::as_str)
      .collect()
  }

  #[test]
  fn empty_command_line() {
    assert_eq!(
      match_arguments(Vec::<String>::new()).unwrap(),
      ParsedArguments::default()
    );
  }

  #[test]
  fn long_and_short_forms() {
    for tokens in [
      vec!["--samples", "7"],
      vec!["--samples=7"],
      vec!["-s", "7"],
      vec!["-s7"],
      vec!["-s=7"],
    ] {
      let parsed = match_arguments(tokens.clone()).unwrap();
      assert_eq!(values(&parsed, SAMPLES), vec!["7"], "{tokens:?}");
    }
  }

  #[test]
  fn multi_character_aliases() {
    let parsed = match_arguments(["-ci", "0.5", "-rs=10", "-lp", "-lr"]).unwrap();
    assert_eq!(values(&parsed, CONFIDENCE_INTERVAL), vec!["0.5"]);
    assert_eq!(values(&parsed, RESAMPLES), vec!["10"]);
    assert!(parsed.contains(LIST_PARAMS));
    assert!(parsed.contains(LIST_REPORTERS));
    assert!(!parsed.contains(LIST));
  }

  #[test]
  fn flags_use_the_empty_sentinel() {
    let parsed = match_arguments(["-A", "--list"]).unwrap();
    assert_eq!(values(&parsed, NO_ANALYSIS), vec![""]);
    assert_eq!(values(&parsed, LIST), vec![""]);
  }

  #[test]
  fn bundled_short_flags() {
    let parsed = match_arguments(["-vq"]).unwrap();
    assert!(parsed.contains(VERBOSE));
    assert!(parsed.contains(SUMMARY));
  }

  #[test]
  fn values_may_start_with_a_hyphen() {
    let parsed = match_arguments(["-s", "-1", "-t", "-lp"]).unwrap();
    assert_eq!(values(&parsed, SAMPLES), vec!["-1"]);
    assert_eq!(values(&parsed, TITLE), vec!["-lp"]);
    assert!(!parsed.contains(LIST_PARAMS));
  }

  #[test]
  fn last_occurrence_wins() {
    let parsed = match_arguments(["-s", "1", "--samples", "2", "-r", "csv", "-r", "junit"]).unwrap();
    assert_eq!(values(&parsed, SAMPLES), vec!["2"]);
    assert_eq!(values(&parsed, REPORTER), vec!["junit"]);
  }

  #[test]
  fn params_keep_every_occurrence() {
    let parsed = match_arguments(["-p", "a:1", "--param", "b:+:0:1:3", "--param=c:2"]).unwrap();
    assert_eq!(values(&parsed, PARAM), vec!["a:1", "b:+:0:1:3", "c:2"]);
  }

  #[test]
  fn unknown_tokens_fail() {
    assert!(matches!(
      match_arguments(["--bogus"]),
      Err(ArgumentError::UnrecognizedOption { .. })
    ));
    assert!(matches!(
      match_arguments(["stray"]),
      Err(ArgumentError::UnrecognizedOption { .. })
    ));
    assert!(matches!(
      match_arguments(["-V"]),
      Err(ArgumentError::UnrecognizedOption { .. })
    ));
  }

  #[test]
  fn flags_reject_values() {
    assert!(matches!(
      match_arguments(["--list=yes"]),
      Err(ArgumentError::UnrecognizedOption { .. })
    ));
  }

  #[test]
  fn trailing_option_without_value() {
    assert!(matches!(
      match_arguments(["-l", "-s"]),
      Err(ArgumentError::MissingValue { .. })
    ));
  }
}
