use std::process::ExitCode;

use clap::Parser;
use excon::{Cli, Context, cli, dispatch};
use excon_core::AdapterConfig;
use excon_model::collapse_exit_code;
use excon_observe::logger_init;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return cli::exit_for(&e),
    };

    let session = AdapterConfig::default().with_process_session();
    let config = match cli.settings.apply(session) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("excon: {e}");
            return ExitCode::from(1);
        }
    };
    if let Err(e) = logger_init(&config.logger) {
        eprintln!("excon: logging disabled: {e}");
    }

    let ctx = Context::new(config);
    let code = dispatch(cli.command, &ctx).await;
    ExitCode::from(collapse_exit_code(code.into()))
}
