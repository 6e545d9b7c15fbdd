use clap::Parser;
use lysta::cli::commands::Cli;
use lysta::cli::handlers;

fn main() {
    lysta::logging::init_tracing();
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
