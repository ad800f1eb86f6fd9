//! The ordered phases of a coverage run.
//!
//! Every step is a pure function from the [`RunConfig`] and [`PathContext`] to an [`Invocation`], so a plan can be
//! checked without launching anything:
//!
//! | Phase | Working directory | Command |
//! |-------|-------------------|---------|
//! | Configure | root | `cmake -S <root> -B <build> -G <generator> -D...` with `CXX` and `CC` set |
//! | Build | root | `cmake --build <build> --parallel 4` |
//! | Test | test | `<project>_tests --gtest_output=xml` |
//! | Merge | test | `llvm-profdata merge -sparse default.profraw -o <project>_tests.profdata` |
//! | Export | test | `llvm-cov export` as JSON and LCOV, then `llvm-cov show` as HTML |
//!
//! [`RunConfig`]: ../config/struct.RunConfig.html
//! [`PathContext`]: ../paths/struct.PathContext.html
//! [`Invocation`]: ../command/struct.Invocation.html

use command::Invocation;
use config::RunConfig;
use paths::PathContext;

use std::ffi::OsString;
use std::fmt;

/// Number of parallel jobs given to the build driver.
pub const BUILD_JOBS: u32 = 4;

/// A phase of the run. Phases always execute in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Configure,
    Build,
    Test,
    Merge,
    Export,
}

impl Phase {
    /// The state reached once every step of this phase succeeded.
    pub fn completed(self) -> State {
        match self {
            Phase::Configure => State::Configured,
            Phase::Build => State::Built,
            Phase::Test => State::Tested,
            Phase::Merge => State::ProfileMerged,
            Phase::Export => State::Exported,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Configure => "configure",
            Phase::Build => "build",
            Phase::Test => "test",
            Phase::Merge => "merge",
            Phase::Export => "export",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress of a run.
///
/// ```text
/// Idle -> Configured -> Built -> Tested -> ProfileMerged -> Exported
///   \________\___________\________\___________\-> Failed(phase)
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Configured,
    Built,
    Tested,
    ProfileMerged,
    Exported,
    /// Terminal. The phase is the one whose step failed.
    Failed(Phase),
}

impl State {
    /// The phase allowed to run from this state, or `None` if the run is over.
    pub fn next_phase(self) -> Option<Phase> {
        match self {
            State::Idle => Some(Phase::Configure),
            State::Configured => Some(Phase::Build),
            State::Built => Some(Phase::Test),
            State::Tested => Some(Phase::Merge),
            State::ProfileMerged => Some(Phase::Export),
            State::Exported | State::Failed(_) => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next_phase().is_none()
    }
}

/// One external invocation belonging to a phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub invocation: Invocation,
}

fn define(name: &str, ty: &str, value: &str) -> String {
    format!("-D{}:{}={}", name, ty, value)
}

/// Configures the build tree with every run option passed as a cache entry.
pub fn configure(config: &RunConfig, paths: &PathContext) -> Invocation {
    let sanitizers = config.sanitizers.as_str();
    Invocation::new(&config.tools.cmake, paths.root())
        .env("CXX", config.cxx_path())
        .env("CC", config.cc_path())
        .arg("-S")
        .arg(paths.root())
        .arg("-B")
        .arg(paths.build())
        .arg("-G")
        .arg(&config.generator)
        .args(&[
            define(&config.option_name("ENABLE_IPO"), "BOOL", config.enable_ipo.as_str()),
            define("CMAKE_BUILD_TYPE", "STRING", config.build_type.as_str()),
            define(&config.option_name("ENABLE_COVERAGE"), "BOOL", config.coverage.as_str()),
            define(&config.option_name("ENABLE_SANITIZER_ADDRESS"), "BOOL", sanitizers),
            define(&config.option_name("ENABLE_SANITIZER_LEAK"), "BOOL", sanitizers),
            define(&config.option_name("ENABLE_SANITIZER_UNDEFINED"), "BOOL", sanitizers),
        ])
}

/// Builds the configured tree.
pub fn build(config: &RunConfig, paths: &PathContext) -> Invocation {
    Invocation::new(&config.tools.cmake, paths.root())
        .arg("--build")
        .arg(paths.build())
        .arg("--parallel")
        .arg(BUILD_JOBS.to_string())
}

/// Runs the test binary, which writes `test_detail.xml` and `default.profraw` into its working directory.
pub fn test(config: &RunConfig, paths: &PathContext) -> Invocation {
    Invocation::new(paths.test_binary(config), paths.test()).arg("--gtest_output=xml")
}

/// Merges the raw profile into the sparse indexed profile.
pub fn merge(config: &RunConfig, paths: &PathContext) -> Invocation {
    Invocation::new(&config.tools.llvm_profdata, paths.test())
        .args(&["merge", "-sparse"])
        .arg(paths.raw_profile())
        .arg("-o")
        .arg(paths.profile_data(config))
}

fn instr_profile(config: &RunConfig, paths: &PathContext) -> OsString {
    let mut arg = OsString::from("-instr-profile=");
    arg.push(paths.profile_data(config));
    arg
}

/// Exports the merged profile as llvm-cov JSON into `coverage.json`.
pub fn export_json(config: &RunConfig, paths: &PathContext) -> Invocation {
    Invocation::new(&config.tools.llvm_cov, paths.test())
        .arg("export")
        .arg(paths.test_binary(config))
        .arg(instr_profile(config, paths))
        .stdout_to(paths.coverage_json())
}

/// Exports the merged profile as LCOV tracefile into `coverage.lcov`.
pub fn export_lcov(config: &RunConfig, paths: &PathContext) -> Invocation {
    Invocation::new(&config.tools.llvm_cov, paths.test())
        .arg("export")
        .arg(paths.test_binary(config))
        .arg(instr_profile(config, paths))
        .arg("-format=lcov")
        .stdout_to(paths.coverage_lcov())
}

/// Renders the annotated sources as a single HTML page into `coverage.html`.
pub fn export_html(config: &RunConfig, paths: &PathContext) -> Invocation {
    Invocation::new(&config.tools.llvm_cov, paths.test())
        .arg("show")
        .arg(paths.test_binary(config))
        .arg(instr_profile(config, paths))
        .arg("-format=html")
        .stdout_to(paths.coverage_html())
}

/// Lists all steps of a run in execution order.
pub fn plan(config: &RunConfig, paths: &PathContext) -> Vec<Step> {
    let builders: [(Phase, fn(&RunConfig, &PathContext) -> Invocation); 7] = [
        (Phase::Configure, configure),
        (Phase::Build, build),
        (Phase::Test, test),
        (Phase::Merge, merge),
        (Phase::Export, export_json),
        (Phase::Export, export_lcov),
        (Phase::Export, export_html),
    ];
    builders
        .iter()
        .map(|&(phase, builder)| {
            Step {
                phase,
                invocation: builder(config, paths),
            }
        })
        .collect()
}
