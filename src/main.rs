use clap::Parser;
use scada_db_compiler::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();
    cli::setup_logging(args.log_level());

    match cli::run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
