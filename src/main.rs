//! Provides the main entry point to the program.
use human_panic::{metadata, setup_panic};
use log::error;
use rental_explorer::cli::run_cli;
use rental_explorer::log::is_logger_initialised;

fn main() {
    setup_panic!(metadata!().support("Please report the problem along with the command you ran."));

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
