use std::path::Path;

use super::types::LaunchError;

/// Check that the interpreter exists and is executable before handing off to it
///
/// The bundle layout fixes the interpreter's location, so unlike a shell there is
/// no PATH search: the path is used literally.
pub fn check_interpreter(path: &Path) -> Result<(), LaunchError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => {
            return Err(LaunchError::InterpreterMissing {
                path: path.to_path_buf(),
            });
        }
    };

    if !metadata.is_file() {
        return Err(LaunchError::InterpreterNotExecutable {
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(LaunchError::InterpreterNotExecutable {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}
