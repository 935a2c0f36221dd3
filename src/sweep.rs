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

//! The `--param` descriptor grammar and the merging of several descriptors
//! into a single sweep.
//!
//! A descriptor is either a fixed override, `name:value`, or an arithmetic
//! progression, `name:op:init:delta:steps`:
//!
//! * `size:64` yields `[{size: 64}]`
//! * `size:+:0:2:3` yields `[{size: 0}, {size: 2}, {size: 4}]`
//! * `size:*:1:2:4` yields `[{size: 1}, {size: 2}, {size: 4}, {size: 8}]`

use crate::error::SweepError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// One assignment of parameter values, keyed by parameter name.
pub type ParamMap = BTreeMap<String, String>;

/// Upper bound on the number of steps a single progression may generate.
pub const MAX_STEPS: usize = 1 << 20;

/// Returns the union of both maps, `right` winning on key collisions.
pub fn merge_maps(left: &ParamMap, right: &ParamMap) -> ParamMap {
  let mut merged = left.clone();
  merged.extend(right.iter().map(|(k, v)| (k.clone(), v.clone())));
  merged
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progression {
  Add,
  Multiply,
}

impl Progression {
  fn next(self, current: i64, delta: i64) -> Option<i64> {
    match self {
      Progression::Add => current.checked_add(delta),
      Progression::Multiply => current.checked_mul(delta),
    }
  }
}

impl FromStr for Progression {
  type Err = SweepError;

  fn from_str(op: &str) -> Result<Self, Self::Err> {
    match op {
      "+" => Ok(Progression::Add),
      "*" => Ok(Progression::Multiply),
      other => Err(SweepError::UnknownOperator(other.to_string())),
    }
  }
}

/// An ordered list of parameter assignments.
///
/// The order is either the order of a progression or the order produced by
/// merging, and is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamSweep(Vec<ParamMap>);

impl ParamSweep {
  /// Parses a single `--param` descriptor.
  pub fn parse(descriptor: &str) -> Result<Self, SweepError> {
    let fields: Vec<&str> = descriptor.split(':').collect();

    match fields.as_slice() {
      [name, value] => Ok(ParamSweep(vec![single(name, value.to_string())])),
      [name, op, init, delta, steps] => {
        let progression: Progression = op.parse()?;
        let init = parse_i64("init", init)?;
        let delta = parse_i64("delta", delta)?;
        let steps = steps
          .parse::<usize>()
          .map_err(|_| SweepError::InvalidNumber {
            field: "steps",
            value: steps.to_string(),
          })?;

        if steps == 0 {
          return Err(SweepError::Empty);
        }
        if steps > MAX_STEPS {
          return Err(SweepError::TooManySteps {
            steps,
            limit: MAX_STEPS,
          });
        }

        let mut maps = Vec::with_capacity(steps);
        let mut current = init;
        for step in 0..steps {
          if step > 0 {
            current = progression
              .next(current, delta)
              .ok_or(SweepError::Overflow { step })?;
          }
          maps.push(single(name, current.to_string()));
        }
        Ok(ParamSweep(maps))
      }
      _ => Err(SweepError::Arity {
        fields: fields.len(),
      }),
    }
  }

  /// Combines this accumulated sweep with the sweep of the next descriptor.
  ///
  /// A single-element side is broadcast into every element of the other
  /// side; `incoming` values win on key collisions. At most one side may
  /// hold more than one element.
  pub fn merge(self, incoming: ParamSweep) -> Result<Self, SweepError> {
    match (self.0.as_slice(), incoming.0.as_slice()) {
      ([], _) | (_, []) => Err(SweepError::Empty),
      ([fixed], [over]) => Ok(ParamSweep(vec![merge_maps(fixed, over)])),
      (axis, [over]) => Ok(ParamSweep(
        axis.iter().map(|map| merge_maps(map, over)).collect(),
      )),
      ([fixed], axis) => Ok(ParamSweep(
        axis.iter().map(|map| merge_maps(fixed, map)).collect(),
      )),
      (existing, incoming) => Err(SweepError::TwoVaryingAxes {
        existing: existing.len(),
        incoming: incoming.len(),
      }),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, ParamMap> {
    self.0.iter()
  }

  /// Every parameter name mentioned anywhere in the sweep.
  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.iter().flat_map(|map| map.keys().map(String::as_str))
  }
}

impl From<Vec<ParamMap>> for ParamSweep {
  fn from(maps: Vec<ParamMap>) -> Self {
    ParamSweep(maps)
  }
}

impl<'a> IntoIterator for &'a ParamSweep {
  type Item = &'a ParamMap;
  type IntoIter = std::slice::Iter<'a, ParamMap>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

fn single(name: &str, value: String) -> ParamMap {
  ParamMap::from([(name.to_string(), value)])
}

fn parse_i64(field: &'static str, raw: &str) -> Result<i64, SweepError> {
  raw.parse().map_err(|_| SweepError::InvalidNumber {
    field,
    value: raw.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sweep(maps: &[&[(&str, &str)]]) -> ParamSweep {
    ParamSweep(
      maps
        .iter()
        .map(|pairs| {
          pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
        })
        .collect(),
    )
  }

  #[test]
  fn fixed_override() {
    assert_eq!(ParamSweep::parse("x:5").unwrap(), sweep(&[&[("x", "5")]]));
  }

  #[test]
  fn fixed_override_keeps_value_verbatim() {
    assert_eq!(
      ParamSweep::parse("label:").unwrap(),
      sweep(&[&[("label", "")]])
    );
    assert_eq!(
      ParamSweep::parse("label:fast path").unwrap(),
      sweep(&[&[("label", "fast path")]])
    );
  }

  #[test]
  fn additive_progression() {
    assert_eq!(
      ParamSweep::parse("n:+:0:2:3").unwrap(),
      sweep(&[&[("n", "0")], &[("n", "2")], &[("n", "4")]])
    );
  }

  #[test]
  fn multiplicative_progression() {
    assert_eq!(
      ParamSweep::parse("n:*:1:2:4").unwrap(),
      sweep(&[&[("n", "1")], &[("n", "2")], &[("n", "4")], &[("n", "8")]])
    );
  }

  #[test]
  fn negative_delta() {
    assert_eq!(
      ParamSweep::parse("n:+:10:-5:3").unwrap(),
      sweep(&[&[("n", "10")], &[("n", "5")], &[("n", "0")]])
    );
  }

  #[test]
  fn single_step_progression_is_fixed() {
    assert_eq!(
      ParamSweep::parse("n:*:7:0:1").unwrap(),
      sweep(&[&[("n", "7")]])
    );
  }

  #[test]
  fn rejects_malformed_descriptors() {
    assert_eq!(
      ParamSweep::parse("n"),
      Err(SweepError::Arity { fields: 1 })
    );
    assert_eq!(
      ParamSweep::parse("a:b:c"),
      Err(SweepError::Arity { fields: 3 })
    );
    assert_eq!(
      ParamSweep::parse("n:/:1:2:3"),
      Err(SweepError::UnknownOperator("/".to_string()))
    );
    assert!(matches!(
      ParamSweep::parse("n:+:zero:2:3"),
      Err(SweepError::InvalidNumber { field: "init", .. })
    ));
    assert!(matches!(
      ParamSweep::parse("n:+:0:2.5:3"),
      Err(SweepError::InvalidNumber { field: "delta", .. })
    ));
    assert!(matches!(
      ParamSweep::parse("n:+:0:2:-3"),
      Err(SweepError::InvalidNumber { field: "steps", .. })
    ));
    assert_eq!(ParamSweep::parse("n:+:0:1:0"), Err(SweepError::Empty));
  }

  #[test]
  fn rejects_runaway_progressions() {
    assert!(matches!(
      ParamSweep::parse("n:+:0:1:99999999"),
      Err(SweepError::TooManySteps { .. })
    ));
    assert_eq!(
      ParamSweep::parse(&format!("n:*:{}:2:2", i64::MAX)),
      Err(SweepError::Overflow { step: 1 })
    );
  }

  #[test]
  fn merge_two_fixed_overrides() {
    let merged = sweep(&[&[("a", "1"), ("b", "1")]])
      .merge(sweep(&[&[("b", "2"), ("c", "3")]]))
      .unwrap();
    assert_eq!(merged, sweep(&[&[("a", "1"), ("b", "2"), ("c", "3")]]));
  }

  #[test]
  fn merge_broadcasts_fixed_into_axis() {
    let axis = ParamSweep::parse("b:+:0:1:3").unwrap();
    let merged = ParamSweep::parse("a:1").unwrap().merge(axis).unwrap();
    assert_eq!(
      merged,
      sweep(&[
        &[("a", "1"), ("b", "0")],
        &[("a", "1"), ("b", "1")],
        &[("a", "1"), ("b", "2")],
      ])
    );
  }

  #[test]
  fn merge_broadcasts_override_over_axis() {
    let axis = sweep(&[&[("a", "0"), ("b", "x")], &[("a", "1"), ("b", "x")]]);
    let merged = axis.merge(ParamSweep::parse("b:y").unwrap()).unwrap();
    assert_eq!(
      merged,
      sweep(&[&[("a", "0"), ("b", "y")], &[("a", "1"), ("b", "y")]])
    );
  }

  #[test]
  fn axis_values_win_over_earlier_fixed_value() {
    let merged = ParamSweep::parse("n:5")
      .unwrap()
      .merge(ParamSweep::parse("n:+:0:1:2").unwrap())
      .unwrap();
    assert_eq!(merged, sweep(&[&[("n", "0")], &[("n", "1")]]));
  }

  #[test]
  fn merge_rejects_two_varying_axes() {
    let result = ParamSweep::parse("a:+:0:1:2")
      .unwrap()
      .merge(ParamSweep::parse("b:+:0:1:3").unwrap());
    assert_eq!(
      result,
      Err(SweepError::TwoVaryingAxes {
        existing: 2,
        incoming: 3
      })
    );
  }

  #[test]
  fn merge_rejects_empty_operands() {
    assert_eq!(
      ParamSweep::default().merge(ParamSweep::parse("a:1").unwrap()),
      Err(SweepError::Empty)
    );
  }
}
