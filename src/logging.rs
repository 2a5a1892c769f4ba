use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target, WriteStyle};
use log::LevelFilter;

/// Installs the global logger. `RUST_LOG` overrides the default `warn` level.
/// With `log_file` set, output is appended there instead of stderr, which is
/// what the full-screen UI needs.
pub fn init(log_file: Option<&Path>) {
    // A second init (tests, embedding) keeps the first logger.
    let _ = builder(Env::default().default_filter_or("warn"), log_file).try_init();
}

fn builder(env: Env<'_>, log_file: Option<&Path>) -> Builder {
    let mut builder = Builder::from_env(env);

    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder
                    .target(Target::Pipe(Box::new(file)))
                    .write_style(WriteStyle::Never);
            }
            Err(e) => {
                eprintln!("Could not open log file {}: {}", path.display(), e);
                // Start over so no env directive can reach the terminal.
                let mut silent = Builder::new();
                silent.filter_level(LevelFilter::Off);
                return silent;
            }
        }
    }

    builder
}
