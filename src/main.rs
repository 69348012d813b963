use clap::Parser;

mod commands;
mod output;

use commands::checkout::{self, CheckoutArgs};
use ppcheckout::logging::{self, Verbosity};
use ppcheckout::settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "ppcheckout")]
#[command(version = VERSION)]
#[command(about = "Check out a pgdp.net project for post-processing")]
#[command(after_help = "Examples:\n  ppcheckout projectID509579cf64be8\n  ppcheckout projectID509579cf64be8 proj-name")]
struct Cli {
    #[command(flatten)]
    checkout: CheckoutArgs,

    /// Print less text
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print more text
    #[arg(short, long)]
    verbose: bool,

    /// Print the checkout report as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);

    let settings = tracing::dispatcher::with_default(
        &logging::dispatch(verbosity),
        settings::load_settings,
    );

    let result = checkout::run(&cli.checkout, settings, verbosity);

    let exit_code = match &result {
        Ok((_, code)) => *code,
        Err(err) => output::exit_code_for_error(err.code),
    };

    if cli.json {
        let data = result.map(|(report, _)| report);
        if let Err(err) = output::print_result(&data) {
            output::print_error(&err);
            return std::process::ExitCode::from(1);
        }
    } else if let Err(err) = &result {
        output::print_error(err);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
