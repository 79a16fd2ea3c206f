//! Keroosha identity CLI entry point.

use clap::Parser;

use keroosha_identity::logging::init_logging;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli.config_dir, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to load configuration: {}", e));
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(&config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
