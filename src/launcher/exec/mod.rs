mod resolution;
mod types;

use std::io;
use std::process::{Command, ExitStatus};

pub use resolution::check_interpreter;
pub use types::{Handoff, LaunchError, LaunchRequest};

/// Transfer control to the interpreter described by `request`
///
/// With [`Handoff::Exec`] this only returns if the exec call failed. With
/// [`Handoff::Spawn`] it returns the exit code the launcher should exit with.
pub fn hand_off(request: &LaunchRequest, mode: Handoff) -> Result<i32, LaunchError> {
    check_interpreter(&request.program)?;

    log::info!("handing off to {} via {:?}", request.program.display(), mode);

    match mode {
        Handoff::Exec => exec_interpreter(request),
        Handoff::Spawn => spawn_interpreter(request),
    }
}

/// Replace the current process image with the interpreter (never returns on success)
#[cfg(unix)]
fn exec_interpreter(request: &LaunchRequest) -> Result<i32, LaunchError> {
    use nix::unistd::{chdir, execve};
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let handoff_error = |source: io::Error| LaunchError::Handoff {
        program: request.program.clone(),
        source,
    };
    let to_cstring = |bytes: &[u8]| {
        CString::new(bytes)
            .map_err(|e| handoff_error(io::Error::new(io::ErrorKind::InvalidInput, e)))
    };

    let prog_cstr = to_cstring(request.program.as_os_str().as_bytes())?;

    // argv[0] is the interpreter path, exactly as a shell `exec` would pass it
    let mut argv: Vec<CString> = vec![prog_cstr.clone()];
    for arg in &request.args {
        argv.push(to_cstring(arg.as_bytes())?);
    }

    let envp = request
        .env
        .iter()
        .map(|(key, value)| {
            let mut entry = key.as_bytes().to_vec();
            entry.push(b'=');
            entry.extend_from_slice(value.as_bytes());
            to_cstring(entry.as_slice())
        })
        .collect::<Result<Vec<_>, _>>()?;

    chdir(request.cwd.as_path()).map_err(|errno| handoff_error(errno.into()))?;

    let Err(errno) = execve(&prog_cstr, &argv, &envp);
    Err(handoff_error(errno.into()))
}

#[cfg(not(unix))]
fn exec_interpreter(request: &LaunchRequest) -> Result<i32, LaunchError> {
    log::warn!("process image replacement is unavailable here, spawning instead");
    spawn_interpreter(request)
}

/// Run the interpreter as a child with the same argv, environment and stdio,
/// and report the status the launcher should exit with
fn spawn_interpreter(request: &LaunchRequest) -> Result<i32, LaunchError> {
    #[cfg(unix)]
    let interrupted = shield_terminal_signals().map_err(|source| LaunchError::Handoff {
        program: request.program.clone(),
        source,
    })?;

    let status = Command::new(&request.program)
        .args(&request.args)
        .env_clear()
        .envs(request.env.iter().map(|(key, value)| (key, value)))
        .current_dir(&request.cwd)
        .status()
        .map_err(|source| LaunchError::Handoff {
            program: request.program.clone(),
            source,
        })?;

    #[cfg(unix)]
    {
        if interrupted.load(std::sync::atomic::Ordering::Relaxed) {
            log::debug!("terminal signal arrived while the interpreter was running");
        }
    }

    let exit_code = exit_code_from_status(status);
    log::debug!("interpreter exited with {}", exit_code);
    Ok(exit_code)
}

/// Keep the launcher alive through terminal interrupt/quit while the child runs
///
/// The child shares the foreground process group, so it receives these signals
/// itself. Handlers (unlike SIG_IGN) are reset by exec, so the child keeps the
/// default dispositions.
#[cfg(unix)]
fn shield_terminal_signals() -> io::Result<std::sync::Arc<std::sync::atomic::AtomicBool>> {
    use signal_hook::consts::{SIGINT, SIGQUIT};
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    let interrupted = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGQUIT] {
        signal_hook::flag::register(signal, Arc::clone(&interrupted))?;
    }
    Ok(interrupted)
}

/// Convert a child's status to a shell-style exit code
fn exit_code_from_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
