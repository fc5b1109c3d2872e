//! Homebrew directive processor for dotfiles repositories.
//!
//! Reads an ordered list of directives (`tap`, `brew`, `cask`, `brewfile`)
//! from a TOML file and turns each one into `brew` invocations, installing
//! Homebrew first when it is missing.
//!
//! The public API is organised into layers:
//!
//! - **[`platform`]** / **[`brew`]**: host detection, the Homebrew prefix
//!   and the environment every `brew` call runs with
//! - **[`resources`]**: idempotent `check + apply` primitives (taps, packages, bundles)
//! - **[`processor`]**: `can_handle` / `handle` for a single directive
//! - **[`config`]** / **[`commands`]**: loading the directive list and running it
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod brew;
pub mod cli;
pub mod commands;
pub mod config;
pub mod directive;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod processor;
pub mod resources;
