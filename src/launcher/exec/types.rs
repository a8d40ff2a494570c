use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop the launcher before the interpreter takes over
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No invocation path could be determined at all
    #[error("cannot determine where the launcher is installed")]
    UnresolvableBase,

    /// The bundle directory does not exist, is not a directory, or cannot be entered
    #[error("{}: {source}", base.display())]
    UnreachableRoot {
        base: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The interpreter is not where the bundle layout says it should be
    #[error("{}: No such file or directory", path.display())]
    InterpreterMissing { path: PathBuf },

    /// The interpreter exists but cannot be executed
    #[error("{}: Permission denied", path.display())]
    InterpreterNotExecutable { path: PathBuf },

    /// The exec or spawn call itself failed
    #[error("failed to execute {}: {source}", program.display())]
    Handoff {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Get the appropriate exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::UnresolvableBase => 1,
            LaunchError::UnreachableRoot { .. } => 1,
            LaunchError::InterpreterMissing { .. } => 127,
            LaunchError::InterpreterNotExecutable { .. } => 126,
            LaunchError::Handoff { .. } => 127,
        }
    }
}

/// How control is transferred to the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    /// Replace the launcher's process image
    Exec,
    /// Run the interpreter as a child and exit with its status
    Spawn,
}

impl Default for Handoff {
    fn default() -> Self {
        if cfg!(unix) {
            Handoff::Exec
        } else {
            Handoff::Spawn
        }
    }
}

/// Fully assembled invocation of the interpreter
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(OsString, OsString)>,
    pub cwd: PathBuf,
}
