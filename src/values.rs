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
use crate::error::ConversionError;
use crate::error::SweepError;
use crate::sweep::ParamSweep;
use thiserror::Error;

/// The declared type of an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
  /// Valueless; presence means `true`.
  Flag,
  Integer,
  Real,
  Text,
  /// A `--param` descriptor.
  Sweep,
}

/// A raw option value converted to its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Flag(bool),
  Integer(i64),
  Real(f64),
  Text(String),
  Sweep(ParamSweep),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
  #[error(transparent)]
  Conversion(#[from] ConversionError),

  #[error(transparent)]
  Sweep(#[from] SweepError),
}

impl ValueKind {
  /// Converts `raw` into a value of this kind.
  pub fn parse(self, raw: &str) -> Result<Value, ValueError> {
    match self {
      ValueKind::Flag => Ok(Value::Flag(true)),
      ValueKind::Integer => raw
        .trim()
        .parse()
        .map(Value::Integer)
        .map_err(|_| self.conversion_error(raw)),
      ValueKind::Real => raw
        .trim()
        .parse()
        .map(Value::Real)
        .map_err(|_| self.conversion_error(raw)),
      ValueKind::Text => Ok(Value::Text(raw.to_string())),
      ValueKind::Sweep => Ok(Value::Sweep(ParamSweep::parse(raw)?)),
    }
  }

  /// Human-readable name of the kind, used in conversion errors.
  pub fn expected(self) -> &'static str {
    match self {
      ValueKind::Flag => "no value",
      ValueKind::Integer => "an integer",
      ValueKind::Real => "a real number",
      ValueKind::Text => "text",
      ValueKind::Sweep => "a parameter descriptor",
    }
  }

  fn conversion_error(self, raw: &str) -> ValueError {
    ValueError::Conversion(ConversionError {
      value: raw.to_string(),
      expected: self.expected(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn integers() {
    assert_eq!(ValueKind::Integer.parse("42"), Ok(Value::Integer(42)));
    assert_eq!(ValueKind::Integer.parse("-1"), Ok(Value::Integer(-1)));
    assert!(matches!(
      ValueKind::Integer.parse("abc"),
      Err(ValueError::Conversion(_))
    ));
    assert!(matches!(
      ValueKind::Integer.parse("99999999999999999999"),
      Err(ValueError::Conversion(_))
    ));
    assert!(matches!(
      ValueKind::Integer.parse("1.5"),
      Err(ValueError::Conversion(_))
    ));
  }

  #[test]
  fn reals() {
    assert_eq!(ValueKind::Real.parse("0.95"), Ok(Value::Real(0.95)));
    assert_eq!(ValueKind::Real.parse("1"), Ok(Value::Real(1.0)));
    assert!(matches!(
      ValueKind::Real.parse("ninety"),
      Err(ValueError::Conversion(_))
    ));
  }

  #[test]
  fn flags_and_text() {
    assert_eq!(ValueKind::Flag.parse(""), Ok(Value::Flag(true)));
    assert_eq!(
      ValueKind::Text.parse(" spaced "),
      Ok(Value::Text(" spaced ".to_string()))
    );
  }

  #[test]
  fn sweep_errors_are_not_conversion_errors() {
    assert!(matches!(
      ValueKind::Sweep.parse("a:b:c"),
      Err(ValueError::Sweep(SweepError::Arity { fields: 3 }))
    ));
  }
}
