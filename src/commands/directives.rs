//! Command: list the directives this platform supports.
use crate::directive::Directive;
use crate::platform::Platform;

/// Directive names supported on `platform`, one per line.
#[must_use]
pub fn listing(platform: &Platform) -> String {
    Directive::supported_on(platform)
        .iter()
        .map(|d| format!("{d}\n"))
        .collect()
}

/// Print the directives supported on `platform`.
#[allow(clippy::print_stdout)]
pub fn run(platform: &Platform) {
    print!("{}", listing(platform));
}
