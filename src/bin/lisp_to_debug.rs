//! Read a Lisp expression and render its tree:
//! - Debug on stdout - the internal representation from the `consread` crate.
//! - Errors on stderr.
//!
//! The debug format is given by the defaults of the `derive(Debug)` macro in Rust.
//! Set `RUST_LOG=trace` to see the tokens and lists as they are read.
//!
//! ```ignore
//! <input.lisp lisp_to_debug
//! ```

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match consread::read_from(std::io::stdin().lock()) {
        Ok(object) => {
            println!("{:#?}", object);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
