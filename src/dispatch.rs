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
use crate::catalog::help_text;
use crate::config::Configuration;
use crate::engine::RunEngine;
use crate::error::RunFailure;
use crate::registry::Registries;
use std::any::Any;
use std::io;
use std::io::Write;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ARGUMENT_ERROR: i32 = 17;
pub const EXIT_RUN_FAILURE: i32 = 23;

// Serializes swaps of the process-wide panic hook.
static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// The single top-level action an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Help,
  ListBenchmarks,
  ListParams,
  ListReporters,
  Run,
}

impl Action {
  /// Picks the action by precedence: help, list, list-params,
  /// list-reporters, then run.
  pub fn select(config: &Configuration) -> Self {
    if config.help {
      Action::Help
    } else if config.list_benchmarks {
      Action::ListBenchmarks
    } else if config.list_params {
      Action::ListParams
    } else if config.list_reporters {
      Action::ListReporters
    } else {
      Action::Run
    }
  }
}

/// Where the dispatcher writes and what it consults.
pub struct Dispatcher<'a, O, E> {
  pub program: &'a str,
  pub registries: &'a Registries,
  pub engine: &'a dyn RunEngine,
  pub stdout: O,
  pub stderr: E,
}

impl<O: Write, E: Write> Dispatcher<'_, O, E> {
  /// Parses `args` (program name excluded), runs the selected action and
  /// returns the process exit code.
  pub fn execute<I, S>(&mut self, args: I) -> io::Result<i32>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    match Configuration::parse(args, self.registries) {
      Ok(config) => self.dispatch(&config),
      Err(error) => {
        tracing::warn!(%error, "Invalid command line");
        self.stdout.write_all(help_text(self.program).as_bytes())?;
        self.stdout.flush()?;
        Ok(EXIT_ARGUMENT_ERROR)
      }
    }
  }

  /// Runs the action selected by `config`.
  pub fn dispatch(&mut self, config: &Configuration) -> io::Result<i32> {
    let action = Action::select(config);
    tracing::debug!(?action, "Dispatching");

    match action {
      Action::Help => self.stdout.write_all(help_text(self.program).as_bytes())?,
      Action::ListBenchmarks => self.list_benchmarks()?,
      Action::ListParams => self.list_params()?,
      Action::ListReporters => self.list_reporters()?,
      Action::Run => return self.run(config),
    }

    self.stdout.flush()?;
    Ok(EXIT_SUCCESS)
  }

  fn list_benchmarks(&mut self) -> io::Result<()> {
    let benchmarks = &self.registries.benchmarks;
    writeln!(self.stdout, "All available benchmarks:")?;
    for benchmark in benchmarks.iter() {
      writeln!(self.stdout, "  {}", benchmark.name)?;
    }
    writeln!(self.stdout)?;
    writeln!(self.stdout, "{} benchmarks", benchmarks.len())
  }

  fn list_params(&mut self) -> io::Result<()> {
    writeln!(self.stdout, "Available parameters (= default):")?;
    for (name, default) in self.registries.parameters.defaults() {
      writeln!(self.stdout, "  {name} = {default}")?;
    }
    Ok(())
  }

  fn list_reporters(&mut self) -> io::Result<()> {
    writeln!(self.stdout, "Available reporters:")?;
    for (name, reporter) in self.registries.reporters.iter() {
      writeln!(self.stdout, "  {name}: {}", reporter.description())?;
    }
    Ok(())
  }

  fn run(&mut self, config: &Configuration) -> io::Result<i32> {
    tracing::info!(
      samples = config.samples,
      resamples = config.resamples,
      reporter = %config.reporter,
      "Starting benchmark run"
    );

    let engine = self.engine;
    let outcome = catch_quietly(|| engine.run(config));
    let failure = match outcome {
      Ok(Ok(())) => return Ok(EXIT_SUCCESS),
      Ok(Err(error)) => RunFailure::Error(error),
      Err(payload) => RunFailure::Panic(panic_message(&*payload)),
    };

    tracing::error!(%failure, "Benchmark run failed");
    writeln!(self.stderr, "PANIC: benchmark run failed")?;
    if let Some(detail) = failure.detail() {
      writeln!(self.stderr, "  {detail}")?;
    }
    self.stderr.flush()?;
    Ok(EXIT_RUN_FAILURE)
  }
}

/// Runs `f`, catching a panic without the panic hook printing a report.
fn catch_quietly<T>(f: impl FnOnce() -> T) -> thread::Result<T> {
  let _lock = PANIC_HOOK.lock().unwrap_or_else(PoisonError::into_inner);
  let hook = panic::take_hook();
  panic::set_hook(Box::new(|_| {}));
  let outcome = panic::catch_unwind(AssertUnwindSafe(f));
  panic::set_hook(hook);
  outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
  payload
    .downcast_ref::<&str>()
    .map(|message| message.to_string())
    .or_else(|| payload.downcast_ref::<String>().cloned())
}
