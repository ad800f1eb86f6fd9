//! `covrun` drives an LLVM source-coverage run of a CMake project.
//!
//! A run is a fixed sequence of external tool invocations: configure the build tree with coverage instrumentation,
//! build it, execute the test binary, merge the raw profile, and export the merged profile as JSON, LCOV and HTML.
//! Each step is described by an [`Invocation`] built from an immutable [`RunConfig`] and a [`PathContext`], so the
//! whole plan can be inspected without spawning anything. A [`Runner`] then executes the plan.
//!
//! [`Invocation`]: command/struct.Invocation.html
//! [`RunConfig`]: config/struct.RunConfig.html
//! [`PathContext`]: paths/struct.PathContext.html
//! [`Runner`]: runner/trait.Runner.html

#![recursion_limit = "128"] // needed for error_chain.

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;
extern crate serde_json;
extern crate shell_escape;
extern crate toml;

#[cfg(test)]
extern crate tempfile;

mod utils;
pub mod command;
pub mod config;
pub mod error;
pub mod paths;
pub mod pipeline;
pub mod runner;
pub mod summary;

pub use command::Invocation;
pub use config::{BuildType, RunConfig, Switch, Tools};
pub use error::{Error, ErrorKind, Result};
pub use paths::PathContext;
pub use pipeline::{Phase, State, Step};
pub use runner::{Orchestrator, Runner, SystemRunner};
pub use summary::Summary;
pub use utils::{clean_dir, remove_file_if_exists};

/// Performs a complete coverage run.
///
/// The configuration is validated first, so an invalid configuration never spawns any process. Afterwards every step
/// from [`pipeline::plan()`] is executed in order, stopping at the first failure.
///
/// [`pipeline::plan()`]: pipeline/fn.plan.html
pub fn run<R: Runner>(config: &RunConfig, paths: &PathContext, runner: R) -> Result<()> {
    config.validate()?;
    let steps = pipeline::plan(config, paths);
    Orchestrator::new(runner).run(&steps)
}
