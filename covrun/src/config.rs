//! Run configuration.
//!
//! A [`RunConfig`] is created once per process, either from the built-in defaults or from a TOML file, and is never
//! mutated afterwards. All keys in the TOML file are optional:
//!
//! ```toml
//! project = "cpp_practice"
//! compiler = "clang++"
//! c_compiler = "clang"
//! toolchain_dir = "/usr/bin"
//! generator = "Ninja"
//! enable_ipo = "OFF"
//! build_type = "Debug"
//! sanitizers = "OFF"
//! coverage = "ON"
//!
//! [tools]
//! cmake = "cmake"
//! llvm_profdata = "llvm-profdata-16"
//! llvm_cov = "llvm-cov-16"
//! ```
//!
//! [`RunConfig`]: ./struct.RunConfig.html

use error::{ErrorKind, Result, ResultExt};

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A cmake `BOOL` cache value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Switch {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl Switch {
    /// The canonical token understood by cmake.
    pub fn as_str(self) -> &'static str {
        match self {
            Switch::On => "ON",
            Switch::Off => "OFF",
        }
    }
}

impl From<bool> for Switch {
    fn from(on: bool) -> Switch {
        if on {
            Switch::On
        } else {
            Switch::Off
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `CMAKE_BUILD_TYPE`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executables of the external tools. A bare name is searched in `PATH`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tools {
    /// Build-system generator and build driver.
    pub cmake: PathBuf,
    /// Merges `*.profraw` into `*.profdata`.
    pub llvm_profdata: PathBuf,
    /// Exports `*.profdata` into coverage reports.
    pub llvm_cov: PathBuf,
}

impl Default for Tools {
    fn default() -> Tools {
        Tools {
            cmake: "cmake".into(),
            llvm_profdata: "llvm-profdata-16".into(),
            llvm_cov: "llvm-cov-16".into(),
        }
    }
}

/// Options of a coverage run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Prefix of the project's cmake options, e.g. `<project>_ENABLE_COVERAGE`. The test binary is `<project>_tests`.
    pub project: String,
    /// C++ compiler executable name, exported as `CXX`.
    pub compiler: String,
    /// C compiler executable name, exported as `CC`.
    pub c_compiler: String,
    /// Directory containing the compilers.
    pub toolchain_dir: PathBuf,
    /// The cmake generator, e.g. `Ninja`.
    pub generator: String,
    /// Enables interprocedural (link-time) optimization.
    pub enable_ipo: Switch,
    pub build_type: BuildType,
    /// Enables the address, leak and undefined-behavior sanitizers together.
    pub sanitizers: Switch,
    /// Enables coverage instrumentation.
    pub coverage: Switch,
    pub tools: Tools,
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig {
            project: "cpp_practice".to_owned(),
            compiler: "clang++".to_owned(),
            c_compiler: "clang".to_owned(),
            toolchain_dir: "/usr/bin".into(),
            generator: "Ninja".to_owned(),
            enable_ipo: Switch::Off,
            build_type: BuildType::Debug,
            sanitizers: Switch::Off,
            coverage: Switch::On,
            tools: Tools::default(),
        }
    }
}

impl RunConfig {
    /// Parses a configuration from TOML. Missing keys take their default values.
    pub fn from_toml(content: &str) -> Result<RunConfig> {
        Ok(::toml::from_str(content)?)
    }

    /// Reads a configuration from a TOML file.
    pub fn from_path(path: &Path) -> Result<RunConfig> {
        let mut content = String::new();
        File::open(path).and_then(|mut f| f.read_to_string(&mut content)).chain_err(|| format!("cannot read `{}`", path.display()))?;
        RunConfig::from_toml(&content).chain_err(|| format!("cannot parse `{}`", path.display()))
    }

    /// Checks that no string option is empty.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyOption`] naming the first empty option.
    ///
    /// [`EmptyOption`]: ../error/enum.ErrorKind.html#variant.EmptyOption
    pub fn validate(&self) -> Result<()> {
        let options: [(&'static str, &Path); 8] = [
            ("project", Path::new(&self.project)),
            ("compiler", Path::new(&self.compiler)),
            ("c_compiler", Path::new(&self.c_compiler)),
            ("toolchain_dir", self.toolchain_dir.as_path()),
            ("generator", Path::new(&self.generator)),
            ("tools.cmake", self.tools.cmake.as_path()),
            ("tools.llvm_profdata", self.tools.llvm_profdata.as_path()),
            ("tools.llvm_cov", self.tools.llvm_cov.as_path()),
        ];
        for &(name, value) in &options {
            ensure!(!value.as_os_str().is_empty(), ErrorKind::EmptyOption(name));
        }
        Ok(())
    }

    /// Path to the C++ compiler, the value of `CXX`.
    pub fn cxx_path(&self) -> PathBuf {
        self.toolchain_dir.join(&self.compiler)
    }

    /// Path to the C compiler, the value of `CC`.
    pub fn cc_path(&self) -> PathBuf {
        self.toolchain_dir.join(&self.c_compiler)
    }

    /// File name of the test binary produced by the build.
    pub fn test_binary_name(&self) -> String {
        format!("{}_tests", self.project)
    }

    /// Name of a project-scoped cmake option, e.g. `cpp_practice_ENABLE_IPO`.
    pub fn option_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.project, suffix)
    }
}
