//! Extra functions for command line argument parsing.

use clean::CleanTargets;
use error::Result;
use lookup::repository_root;

use clap::ArgMatches;
use covrun::{PathContext, RunConfig};

use std::ffi::OsStr;
use std::path::Path;

/// Reads a global option (`--root` or `--config`), which may be written before or after the subcommand:
///
/// ```sh
/// run-coverage --root /src/a clean
/// run-coverage clean --root /src/a
/// ```
fn value_of_global<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a OsStr> {
    let (_, sub_matches) = matches.subcommand();
    sub_matches.and_then(|m| m.value_of_os(name)).or_else(|| matches.value_of_os(name))
}

/// The configuration and directory layout selected by the global options.
#[derive(Debug)]
pub struct Settings {
    pub config: RunConfig,
    pub paths: PathContext,
}

impl Settings {
    /// Resolves `--root` and loads `--config`, falling back to the built-in root and defaults.
    pub fn parse(matches: &ArgMatches) -> Result<Settings> {
        let root = repository_root(value_of_global(matches, "root"))?;
        let config = match value_of_global(matches, "config") {
            Some(path) => RunConfig::from_path(Path::new(path))?,
            None => RunConfig::default(),
        };
        Ok(Settings {
            config,
            paths: PathContext::new(root),
        })
    }
}

/// Translates the flags of `run-coverage clean` into the targets to remove.
///
/// Without any flag, the reports and profiles are removed but the build tree is kept.
pub fn clean_targets(matches: &ArgMatches) -> CleanTargets {
    let mut targets = CleanTargets::empty();
    if matches.is_present("all") {
        targets |= CleanTargets::all();
    }
    if matches.is_present("report") {
        targets |= CleanTargets::REPORT;
    }
    if matches.is_present("profile") {
        targets |= CleanTargets::PROFILE;
    }
    if targets.is_empty() {
        targets = CleanTargets::REPORT | CleanTargets::PROFILE;
    }
    targets
}
