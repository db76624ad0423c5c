//! liveproto-setup CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use liveproto_setup::cli::{run, Cli};
use liveproto_setup::system::HostSystem;
use liveproto_setup::ui::{TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so they never interleave with the summary on stdout.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("liveproto_setup=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("liveproto_setup=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("liveproto-setup starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = TerminalUI::new(cli.output_mode());
    let mut system = HostSystem::new();

    match run(&cli, &mut system, &mut ui) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
