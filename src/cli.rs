//! CLI argument definitions.

use clap::Parser;

use crate::address::Address;

/// Top-level CLI parser for `poc-scaffold`.
#[derive(Debug, Parser)]
#[command(
    name = "poc-scaffold",
    version,
    about = "Scaffold a forked proof-of-concept test project for a deployed contract"
)]
pub struct Cli {
    /// Address of the deployed contract (0x-prefixed).
    #[arg(value_parser = parse_address)]
    pub address: Address,

    /// Destination folder; defaults to the verified contract name.
    pub folder: Option<String>,
}

fn parse_address(raw: &str) -> Result<Address, String> {
    raw.parse::<Address>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    const ADDR: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    #[test]
    fn parses_address_only() {
        let cli = Cli::parse_from(["poc-scaffold", ADDR]);
        assert_eq!(cli.address.as_str(), ADDR);
        assert!(cli.folder.is_none());
    }

    #[test]
    fn parses_folder_override() {
        let cli = Cli::parse_from(["poc-scaffold", ADDR, "usdc-poc"]);
        assert_eq!(cli.folder.as_deref(), Some("usdc-poc"));
    }

    #[test]
    fn rejects_missing_prefix() {
        let result =
            Cli::try_parse_from(["poc-scaffold", "A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_extra_arguments() {
        let result = Cli::try_parse_from(["poc-scaffold", ADDR, "one", "two"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_no_arguments() {
        assert!(Cli::try_parse_from(["poc-scaffold"]).is_err());
    }
}
