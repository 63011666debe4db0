//! Command-line driver for the quicktemplate compiler.
//!
//! Compiles `*.qtpl` templates into Go files placed next to them. The Go
//! package of each generated file is the name of the template's directory.

mod config;
mod driver;
mod error;

pub use config::{parse_args, Command, DriverConfig, DEFAULT_EXT};
pub use driver::{compile_file, find_templates, output_path, package_name, run, Summary};
pub use error::DriverError;

/// Install a `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` enables debug output
/// for the compiler crates. Without either, nothing is installed.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("qtc=debug,qtc_codegen=debug")
    } else {
        return;
    };
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .try_init();
}
