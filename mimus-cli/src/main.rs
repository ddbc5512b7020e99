//! mimus CLI
//!
//! Command-line interface for describing mock services.

fn main() {
    // Errors are reported here only: one line on stderr, exit status 1.
    if let Err(e) = mimus_cli::cli::execute(std::env::args_os()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
