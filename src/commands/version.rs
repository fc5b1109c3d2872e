//! Command: print version information.

/// Print the dotbrew version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    let version = option_env!("DOTBREW_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    println!("dotbrew {version}");
}
