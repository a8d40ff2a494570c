use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::exec::LaunchError;

/// Get the path the launcher is running from
///
/// Prefers the platform's self-executable lookup and falls back to argv[0].
pub fn invocation_path() -> Result<PathBuf, LaunchError> {
    match std::env::current_exe() {
        Ok(path) if !path.as_os_str().is_empty() => Ok(path),
        _ => std::env::args_os()
            .next()
            .filter(|arg0| !arg0.is_empty())
            .map(PathBuf::from)
            .ok_or(LaunchError::UnresolvableBase),
    }
}

/// Read the symlink target of `invocation`, if it is a symlink
///
/// A relative target is taken relative to the directory holding the link, which is
/// how the filesystem itself follows it.
pub fn resolve_invocation_link(invocation: &Path) -> Option<PathBuf> {
    let target = fs::read_link(invocation).ok()?;
    if target.is_absolute() {
        Some(target)
    } else {
        Some(directory_portion(invocation).join(target))
    }
}

/// Pick the directory the bundle root is derived from
pub fn base_directory(invocation: &Path, link: Option<&Path>) -> PathBuf {
    directory_portion(link.unwrap_or(invocation))
}

/// Canonicalize the base directory into the bundle root
///
/// Collapses `.`, `..`, repeated separators and any remaining symlinks. Fails if
/// the directory is gone, is not a directory, or cannot be entered.
pub fn root_directory(base: &Path) -> Result<PathBuf, LaunchError> {
    let unreachable = |source: io::Error| LaunchError::UnreachableRoot {
        base: base.to_path_buf(),
        source,
    };

    let root = fs::canonicalize(base).map_err(unreachable)?;
    if !root.is_dir() {
        return Err(unreachable(io::Error::from(io::ErrorKind::NotADirectory)));
    }

    #[cfg(unix)]
    {
        use nix::unistd::{AccessFlags, access};
        access(root.as_path(), AccessFlags::X_OK)
            .map_err(|errno| unreachable(errno.into()))?;
    }

    Ok(root)
}

/// Everything before the final separator; an empty portion means the current directory
fn directory_portion(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => path.to_path_buf(),
    }
}
