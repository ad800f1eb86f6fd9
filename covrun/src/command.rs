//! Descriptions of external process launches.

use shell_escape::escape;

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Everything needed to launch one external process.
///
/// An `Invocation` never goes through a shell: the arguments are passed to the program as-is, and the working
/// directory is always explicit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// The program to execute.
    pub program: PathBuf,
    /// The arguments, excluding the program itself.
    pub args: Vec<OsString>,
    /// Environment variables added on top of the inherited environment, in the order they are displayed.
    pub envs: Vec<(OsString, OsString)>,
    /// The working directory of the process.
    pub current_dir: PathBuf,
    /// If present, the standard output is written to this file instead of being inherited.
    pub stdout: Option<PathBuf>,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>, D: Into<PathBuf>>(program: P, current_dir: D) -> Invocation {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: current_dir.into(),
            stdout: None,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Invocation {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn env<K: AsRef<OsStr>, V: AsRef<OsStr>>(mut self, key: K, value: V) -> Invocation {
        self.envs.push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    /// Redirects the standard output into `path`. The file is truncated when the process starts.
    pub fn stdout_to<P: Into<PathBuf>>(mut self, path: P) -> Invocation {
        self.stdout = Some(path.into());
        self
    }

    /// The program name used in error messages, e.g. `llvm-cov-16` for `/usr/bin/llvm-cov-16`.
    pub fn program_name(&self) -> Cow<str> {
        self.program.file_name().unwrap_or_else(|| self.program.as_os_str()).to_string_lossy()
    }

    /// Checks whether `arg` appears among the arguments.
    pub fn has_arg<S: AsRef<OsStr>>(&self, arg: S) -> bool {
        self.args.iter().any(|a| a == arg.as_ref())
    }

    /// Converts into a `std::process::Command`. The standard output redirection is not applied, since it requires
    /// creating the file.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.current_dir);
        for &(ref key, ref value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

fn escape_os(s: &OsStr) -> Cow<str> {
    escape(s.to_string_lossy())
}

/// Displays the invocation as an equivalent shell command line, e.g.
/// `CC=/usr/bin/clang cmake --build ./build > out.txt`.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &(ref key, ref value) in &self.envs {
            write!(f, "{}={} ", key.to_string_lossy(), escape_os(value))?;
        }
        write!(f, "{}", escape_os(self.program.as_os_str()))?;
        for arg in &self.args {
            write!(f, " {}", escape_os(arg))?;
        }
        if let Some(ref stdout) = self.stdout {
            write!(f, " > {}", escape_os(stdout.as_os_str()))?;
        }
        Ok(())
    }
}
