use clap::Parser;
use context_aware::cli::{self, Args};
use context_aware::ContextStore;
use tracing::Level;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let outcome = cli::run(&args, ContextStore::instance());
    match &outcome {
        Ok(report) => match serde_json::to_string_pretty(report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Cannot render report: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => eprintln!("Invalid context: {e}"),
    }

    let code = cli::exit_code(&outcome);
    if code != 0 {
        std::process::exit(code);
    }
}
