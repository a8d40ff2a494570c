mod config;
mod launcher;

use anyhow::Result;
use config::LauncherConfig;
use launcher::LaunchError;

/// Launcher diagnostics go to stderr and stay quiet unless asked for
fn init_logging() {
    let env = env_logger::Env::new().filter_or(config::LOG_ENV, config::DEFAULT_LOG_FILTER);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn run() -> Result<i32> {
    let config = LauncherConfig::from_env()?;
    log::debug!("{:?}", config);

    // The launcher takes no arguments; desktop sessions may still append some
    for arg in std::env::args_os().skip(1) {
        log::debug!("ignoring argument {:?}", arg);
    }

    Ok(launcher::launch(&config)?)
}

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("bundle-launcher: {}", e);
            e.downcast_ref::<LaunchError>()
                .map_or(1, LaunchError::exit_code)
        }
    };

    std::process::exit(exit_code);
}
