//! `run-coverage` collects LLVM source coverage of a CMake project.
//!
//! A single invocation configures the build with coverage instrumentation, builds it, runs the test binary, merges
//! the raw profile, and exports `coverage.json`, `coverage.lcov` and `coverage.html` into `build/test/`. The first
//! failing tool aborts the run, and its exit code becomes the exit code of `run-coverage`.

#![recursion_limit = "128"] // needed for error_chain.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate covrun;
extern crate env_logger;
extern crate open;
extern crate termcolor;

#[cfg(test)]
extern crate tempfile;

#[macro_use]
mod ui;
mod argparse;
mod clean;
mod error;
mod lookup;

use argparse::{Settings, clean_targets};
use error::Result;

use clap::App;
use covrun::{Invocation, Runner, Summary, SystemRunner, pipeline};

use std::process::exit;

/// Program entry. Calls [`run()`] and prints any error returned to `stderr`.
///
/// [`run()`]: ./fn.run.html
fn main() {
    if let Err(error) = run() {
        ui::print_error(&error).expect("error while printing error 🤷");
        exit(error.exit_code());
    }
}

/// Runs the `run-coverage` program.
fn run() -> Result<()> {
    let matches = app().get_matches();
    env_logger::init();
    debug!("matches = {:?}", matches);

    let settings = Settings::parse(&matches)?;
    debug!("settings = {:?}", settings);

    match matches.subcommand() {
        ("clean", Some(matches)) => clean::clean(&settings.config, &settings.paths, clean_targets(matches)),
        _ => collect(&settings, matches.is_present("dry-run"), matches.is_present("open")),
    }
}

/// Describes the command line interface using `clap`.
fn app() -> App<'static, 'static> {
    clap_app!(run_coverage =>
        (bin_name: "run-coverage")
        (version: crate_version!())
        (about: crate_description!())
        (@setting DeriveDisplayOrder)
        (@setting VersionlessSubcommands)
        (@arg root: --root [PATH] +global "Repository root, default to the checkout containing this tool")
        (@arg config: --config -c [PATH] +global "TOML file overriding the default run configuration")
        (@arg ("dry-run"): --("dry-run") "Print the commands of every phase without running them")
        (@arg open: --open "Open the HTML report in browser after it is generated")
        (@subcommand clean =>
            (about: "Remove coverage artifacts, default to the reports and profiles")
            (@arg report: --report "Remove coverage.json, coverage.lcov and coverage.html")
            (@arg profile: --profile "Remove the raw and merged profiles and the test results")
            (@arg all: --all "Remove the whole build directory")
        )
    )
}

/// Echoes every command line before handing it to the inner runner.
struct Echo<R>(R);

impl<R: Runner> Runner for Echo<R> {
    fn run(&mut self, invocation: &Invocation) -> covrun::Result<()> {
        progress!("Running", "{}", invocation);
        self.0.run(invocation)
    }
}

/// Performs the coverage run, then summarizes and optionally opens the report.
fn collect(settings: &Settings, dry_run: bool, open_report: bool) -> Result<()> {
    let config = &settings.config;
    let paths = &settings.paths;

    if dry_run {
        config.validate()?;
        ui::print_plan(&pipeline::plan(config, paths))?;
        return Ok(());
    }

    covrun::run(config, paths, Echo(SystemRunner))?;
    progress!("Finished", "coverage reports written to {}", paths.test().display());

    match Summary::from_path(&paths.coverage_json()) {
        Ok(summary) => progress!("Coverage", "{}", summary),
        Err(e) => warning!("cannot summarize coverage: {}", e),
    }

    if open_report {
        let html = paths.coverage_html();
        progress!("Opening", "{}", html.display());
        let status = open::that(&html)?;
        if !status.success() {
            warning!("failed to open report, result: {}", status);
        }
    }

    Ok(())
}
