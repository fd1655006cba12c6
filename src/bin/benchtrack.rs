use std::process;

use benchtrack::{
    cli::CommandLineConfig,
    logging::init_logging,
    pipeline,
    render,
};
use clap::Parser;

fn main() {
    let config = CommandLineConfig::parse();
    init_logging(config.verbosity());

    let request = match config.into_request() {
        Ok(request) => request,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let backend = render::default_backend();
    let outcome = pipeline::run_report(&request, backend.as_deref());
    for failure in outcome.failures() {
        if let Err(err) = &failure.result {
            eprintln!("{} failed: {err}", failure.kind);
        }
    }
    if outcome.outputs.is_empty() {
        eprintln!("nothing to do: no --output-* flag given");
    }
    process::exit(outcome.exit_code());
}
