//! Errors related to the `covrun` crate.
//!
//! Please see documentation of the [`error-chain` crate](https://docs.rs/error-chain/0.12.0/error_chain/) for detailed
//! usage.

use pipeline::{Phase, State};

use std::io;
use std::process::ExitStatus;

error_chain! {
    foreign_links {
        Io(io::Error) /** Wrapper of standard I/O error. */;
        TomlDe(::toml::de::Error) /** Wrapper of TOML deserialization error. */;
        Json(::serde_json::Error) /** Wrapper of JSON error. */;
    }

    errors {
        /// An external tool exited unsuccessfully. The tool's own diagnostics were already written to the inherited
        /// stderr, so this error only records which program failed and how.
        ForwardFailed(program: String, status: ExitStatus) {
            description("external command failed")
            display("`{}` exited with {}", program, status)
        }

        /// A step was given to an [`Orchestrator`] whose state does not allow its phase, e.g. a finished run being
        /// started again.
        ///
        /// [`Orchestrator`]: ../runner/struct.Orchestrator.html
        PhaseOutOfOrder(phase: Phase, state: State) {
            description("step out of order")
            display("cannot run the {} step in state {:?}", phase, state)
        }

        /// A string option of the [`RunConfig`] is empty.
        ///
        /// [`RunConfig`]: ../config/struct.RunConfig.html
        EmptyOption(name: &'static str) {
            description("empty configuration option")
            display("configuration option `{}` must not be empty", name)
        }
    }
}

impl Error {
    /// Obtains the exit code of the failed external command, if this error was caused by one.
    ///
    /// Returns `None` for all other errors, and for a command terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match *self.kind() {
            ErrorKind::ForwardFailed(_, status) => status.code(),
            _ => None,
        }
    }
}
