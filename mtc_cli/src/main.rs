#![forbid(unsafe_code)]

mod ansi;
mod command;
mod error_print;
mod execute;

use mtc_core::error::{ErrorBuffer, ErrorSink};

fn main() {
    let command = match command::parse() {
        Ok(command) => command,
        Err(err) => {
            error_print::print_errors(None, err);
            std::process::exit(1);
        }
    };

    match execute::run(command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            let mut err = ErrorBuffer::default();
            err.error(error);
            error_print::print_errors(None, err);
            std::process::exit(1);
        }
    }
}
