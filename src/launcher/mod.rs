pub mod env;
pub mod exec;
pub mod location;

use std::path::{Path, PathBuf};

use crate::config::LauncherConfig;

// Re-export commonly used types and functions
pub use env::{BOOTSTRAP_EXPRESSION, BundleLayout, EnvironmentBindings};
pub use exec::{Handoff, LaunchError, LaunchRequest, hand_off};

/// Find the bundle root: an explicit override, or the directory the launcher
/// really lives in once symlinks are followed
pub fn locate_root(root_override: Option<&Path>) -> Result<PathBuf, LaunchError> {
    let base = match root_override {
        Some(path) => {
            log::debug!("bundle root overridden to {}", path.display());
            path.to_path_buf()
        }
        None => {
            let invocation = location::invocation_path()?;
            let link = location::resolve_invocation_link(&invocation);
            log::debug!(
                "invoked as {} (link target: {:?})",
                invocation.display(),
                link
            );
            location::base_directory(&invocation, link.as_deref())
        }
    };

    let root = location::root_directory(&base)?;
    log::debug!("bundle root is {}", root.display());
    Ok(root)
}

/// Assemble the interpreter invocation for a bundle rooted at `root`
pub fn build_request(root: &Path, layout: &BundleLayout) -> LaunchRequest {
    let bindings = EnvironmentBindings::new(root, layout);
    for (key, value) in bindings.vars() {
        log::debug!("{}={}", key, value.display());
    }

    LaunchRequest {
        program: bindings.interpreter().to_path_buf(),
        args: vec!["-c".to_string(), BOOTSTRAP_EXPRESSION.to_string()],
        env: bindings.to_envp(),
        cwd: root.to_path_buf(),
    }
}

/// Run the whole launch sequence
///
/// Returns the exit code to leave with. With [`Handoff::Exec`] a successful
/// launch never gets here.
pub fn launch(config: &LauncherConfig) -> Result<i32, LaunchError> {
    let root = locate_root(config.root_override.as_deref())?;
    let request = build_request(&root, &BundleLayout::default());
    hand_off(&request, config.handoff)
}
