//! Core library entry for the `poc-scaffold` CLI.

pub mod adapters;
pub mod address;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod flatten;
pub mod ports;
pub mod proxy;
pub mod scaffold;
pub mod toolchain;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::Error;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print and succeed.
///
/// # Errors
///
/// Returns [`Error::Usage`] when argument parsing fails, otherwise the first
/// error raised while scaffolding.
pub fn run<I, T>(args: I) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| Error::io("failed to print help", e.into()));
        }
        Err(err) => return Err(Error::Usage(err.render().to_string())),
    };
    commands::dispatch(&cli)
}
