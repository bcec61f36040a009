use clap::Parser;
use platform_utils::commands;
use platform_utils::utils::logger::{self, LogFormat};
use platform_utils::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init_logger(LogFormat::from_flag(cli.json_logs), cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    let mut stdout = std::io::stdout();
    match commands::execute(cli.command, &mut stdout).await {
        Ok(commands::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(commands::exit_code(&e));
        }
    }
}
