use clap::Parser;
use tracing::error;

use payoff::api::{Cli, Command, loan_json, run_http_server, savings_json, simulate_json};
use payoff::logging::init_logging;

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let output = match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                error!("server error: {e}");
                std::process::exit(1);
            }
            return;
        }
        Command::Simulate(args) => simulate_json(args),
        Command::Loan(args) => loan_json(&args),
        Command::Savings(args) => savings_json(&args),
    };

    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }
}
