//! Command-line entry point for `whisker`.

#![deny(missing_docs)]

/// Main entry point for the `whisker` tool suite.
fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let exit_code = whisker::run(&args);
    std::process::exit(i32::from(exit_code));
}
