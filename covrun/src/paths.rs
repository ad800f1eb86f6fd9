//! Directory layout of a coverage run.

use config::RunConfig;

use std::path::{Path, PathBuf};

/// Name of the raw profile written by an instrumented program when `LLVM_PROFILE_FILE` is unset.
pub const RAW_PROFILE_NAME: &str = "default.profraw";

/// Name of the result file written by `--gtest_output=xml`.
pub const TEST_RESULTS_NAME: &str = "test_detail.xml";

/// Locations of the repository, its build tree, and the directory where the test binary and all coverage artifacts
/// live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathContext {
    root: PathBuf,
    build: PathBuf,
    test: PathBuf,
}

impl PathContext {
    /// Derives the build and test directories from the repository root.
    pub fn new<P: Into<PathBuf>>(root: P) -> PathContext {
        let root = root.into();
        let build = root.join("build");
        let test = build.join("test");
        PathContext { root, build, test }
    }

    /// The repository root, where `CMakeLists.txt` lives.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The cmake build tree, `<root>/build`.
    pub fn build(&self) -> &Path {
        &self.build
    }

    /// The test output directory, `<root>/build/test`.
    pub fn test(&self) -> &Path {
        &self.test
    }

    pub fn test_binary(&self, config: &RunConfig) -> PathBuf {
        self.test.join(config.test_binary_name())
    }

    pub fn test_results(&self) -> PathBuf {
        self.test.join(TEST_RESULTS_NAME)
    }

    pub fn raw_profile(&self) -> PathBuf {
        self.test.join(RAW_PROFILE_NAME)
    }

    pub fn profile_data(&self, config: &RunConfig) -> PathBuf {
        self.test.join(format!("{}.profdata", config.test_binary_name()))
    }

    pub fn coverage_json(&self) -> PathBuf {
        self.test.join("coverage.json")
    }

    pub fn coverage_lcov(&self) -> PathBuf {
        self.test.join("coverage.lcov")
    }

    pub fn coverage_html(&self) -> PathBuf {
        self.test.join("coverage.html")
    }

    /// All three exported reports.
    pub fn reports(&self) -> [PathBuf; 3] {
        [self.coverage_json(), self.coverage_lcov(), self.coverage_html()]
    }
}

#[test]
fn test_layout() {
    let paths = PathContext::new("/work/repo");
    let config = RunConfig::default();
    assert_eq!(paths.root(), Path::new("/work/repo"));
    assert_eq!(paths.build(), Path::new("/work/repo/build"));
    assert_eq!(paths.test(), Path::new("/work/repo/build/test"));
    assert_eq!(paths.test_binary(&config), Path::new("/work/repo/build/test/cpp_practice_tests"));
    assert_eq!(paths.profile_data(&config), Path::new("/work/repo/build/test/cpp_practice_tests.profdata"));
    assert_eq!(paths.raw_profile(), Path::new("/work/repo/build/test/default.profraw"));
    for report in &paths.reports() {
        assert_eq!(report.parent(), Some(paths.test()));
    }
}
