use std::path::PathBuf;

error_chain! {
    links {
        Covrun(::covrun::Error, ::covrun::ErrorKind);
    }

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        RootNotFound(path: PathBuf) {
            description("repository root not found, please supply the --root option")
            display("repository root `{}` not found, please supply the --root option", path.display())
        }
    }
}

impl Error {
    /// The process exit code for this error: the code of the failed external command if there is one, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match *self.kind() {
            ErrorKind::Covrun(::covrun::ErrorKind::ForwardFailed(_, status)) => status.code().unwrap_or(1),
            _ => 1,
        }
    }
}
