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
use anyhow::Result;
use impabench::dispatch::Dispatcher;
use impabench::engine::PlanEngine;
use impabench::logging::setup_tracing;
use impabench::suite::DEFAULT_SUITE_FILE;
use impabench::suite::SuiteManifest;
use std::env;
use std::io;
use std::path::PathBuf;

fn main() -> Result<()> {
  let guard = setup_tracing()?;

  let mut args = env::args();
  let program = args
    .next()
    .map(PathBuf::from)
    .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
    .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

  let suite_path = env::var_os("IMPABENCH_SUITE")
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_SUITE_FILE));
  let registries = SuiteManifest::load(&suite_path)?.into_registries();
  let engine = PlanEngine::new(&registries);

  let code = {
    let main_span = tracing::info_span!("impabench");
    let _enter = main_span.enter();

    let mut dispatcher = Dispatcher {
      program: &program,
      registries: &registries,
      engine: &engine,
      stdout: io::stdout(),
      stderr: io::stderr(),
    };
    dispatcher.execute(args)?
  };

  drop(guard);
  std::process::exit(code);
}
