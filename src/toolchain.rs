//! Typed wrappers around the external tools.
//!
//! Every invocation goes through the [`ShellExecutor`] port and fails fast:
//! a non-zero exit becomes [`Error::CommandFailed`]. Secrets are referenced
//! as `"$VAR"` so they never appear in logged or recorded command text.

use std::path::Path;

use crate::address::Address;
use crate::config::{API_KEY_VAR, RPC_URL_VAR};
use crate::error::{Error, Result};
use crate::ports::ShellExecutor;

/// Commands that must be on `PATH` before anything else happens.
pub const REQUIRED_COMMANDS: [&str; 5] = ["forge", "cast", "surya", "dot", "sol2uml"];

/// Quotes `arg` for a POSIX shell, leaving plain words untouched.
#[must_use]
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg.bytes().all(|b| b.is_ascii_alphanumeric() || b"_-./:@%+=,".contains(&b));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// The external toolchain, reached through a shell port.
pub struct Toolchain<'a> {
    shell: &'a dyn ShellExecutor,
}

impl<'a> Toolchain<'a> {
    /// Wraps a shell executor.
    #[must_use]
    pub fn new(shell: &'a dyn ShellExecutor) -> Self {
        Self { shell }
    }

    /// Runs `command` and returns its stdout, failing on non-zero exit.
    fn run_checked(&self, command: &str) -> Result<String> {
        tracing::debug!(%command, "running");
        let output = self
            .shell
            .run(command)
            .map_err(|e| Error::io(format!("failed to spawn `{command}`"), e))?;
        if !output.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                status: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Checks that every command in `names` is on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCommand`] for the first one that is not.
    pub fn require_commands(&self, names: &[&str]) -> Result<()> {
        for name in names {
            let command = format!("command -v {}", shell_quote(name));
            let output = self
                .shell
                .run(&command)
                .map_err(|e| Error::io(format!("failed to spawn `{command}`"), e))?;
            if !output.success() {
                return Err(Error::MissingCommand((*name).to_string()));
            }
            tracing::debug!(command = name, path = output.stdout.trim(), "found");
        }
        Ok(())
    }

    /// Reads a raw storage word with `cast storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if `cast` fails.
    pub fn storage_at(&self, address: &Address, slot: &str) -> Result<String> {
        let command = format!(
            "cast storage {} {} --rpc-url \"${RPC_URL_VAR}\"",
            shell_quote(address.as_str()),
            shell_quote(slot)
        );
        Ok(self.run_checked(&command)?.trim().to_string())
    }

    /// Returns the EIP-55 checksummed form of `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if `cast` fails or prints something that is not an
    /// address.
    pub fn checksum(&self, address: &Address) -> Result<Address> {
        let command = format!("cast to-check-sum-address {}", shell_quote(address.as_str()));
        let stdout = self.run_checked(&command)?;
        stdout
            .trim()
            .parse()
            .map_err(|_| Error::UnexpectedOutput { command, output: stdout.clone() })
    }

    /// Creates a Foundry project skeleton at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `forge init` fails.
    pub fn forge_init(&self, dir: &Path) -> Result<()> {
        self.run_checked(&format!("forge init {} --no-git --quiet", quote_path(dir)))?;
        Ok(())
    }

    /// Downloads the verified source of `address` into `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `cast etherscan-source` fails.
    pub fn download_source(&self, address: &Address, out_dir: &Path) -> Result<()> {
        self.run_checked(&format!(
            "cast etherscan-source {} -d {} --etherscan-api-key \"${API_KEY_VAR}\"",
            shell_quote(address.as_str()),
            quote_path(out_dir)
        ))?;
        Ok(())
    }

    /// Produces a Graphviz call graph of the Solidity files in `src_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `surya` fails.
    pub fn call_graph(&self, src_dir: &Path) -> Result<String> {
        self.run_checked(&format!("cd {} && surya graph *.sol", quote_path(src_dir)))
    }

    /// Renders a Graphviz file to PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if `dot` fails.
    pub fn render_png(&self, dot_file: &Path, png: &Path) -> Result<()> {
        self.run_checked(&format!("dot -Tpng {} -o {}", quote_path(dot_file), quote_path(png)))?;
        Ok(())
    }

    /// Draws a UML class diagram of `src_dir` as SVG.
    ///
    /// # Errors
    ///
    /// Returns an error if `sol2uml` fails.
    pub fn class_diagram(&self, src_dir: &Path, svg: &Path) -> Result<()> {
        self.run_checked(&format!("sol2uml class {} -o {}", quote_path(src_dir), quote_path(svg)))?;
        Ok(())
    }

    /// Draws the storage layout of `contract_name`, filled with the live
    /// values held at `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if `sol2uml` fails.
    pub fn storage_diagram(
        &self,
        src_dir: &Path,
        contract_name: &str,
        data: &Address,
        svg: &Path,
    ) -> Result<()> {
        self.run_checked(&format!(
            "sol2uml storage {} -c {} -d {} -u \"${RPC_URL_VAR}\" -o {}",
            quote_path(src_dir),
            shell_quote(contract_name),
            shell_quote(data.as_str()),
            quote_path(svg)
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::PortError;
    use crate::ports::ShellOutput;

    /// Captures commands and answers each with a canned output.
    struct ScriptedShell {
        replies: Mutex<Vec<ShellOutput>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedShell {
        fn new(replies: Vec<(i32, &str, &str)>) -> Self {
            let replies = replies
                .into_iter()
                .rev()
                .map(|(exit_code, stdout, stderr)| ShellOutput {
                    exit_code,
                    stdout: stdout.into(),
                    stderr: stderr.into(),
                })
                .collect();
            Self { replies: Mutex::new(replies), seen: Mutex::new(Vec::new()) }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ShellExecutor for ScriptedShell {
        fn run(&self, command: &str) -> std::result::Result<ShellOutput, PortError> {
            self.seen.lock().unwrap().push(command.to_string());
            self.replies.lock().unwrap().pop().ok_or_else(|| "no scripted reply".into())
        }
    }

    fn addr() -> Address {
        "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".parse().unwrap()
    }

    #[test]
    fn quoting() {
        assert_eq!(shell_quote("forge"), "forge");
        assert_eq!(shell_quote("my project"), "'my project'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn missing_command_is_reported_by_name() {
        let shell = ScriptedShell::new(vec![(0, "/usr/bin/forge\n", ""), (1, "", "")]);
        let err = Toolchain::new(&shell).require_commands(&["forge", "surya"]).unwrap_err();
        assert!(matches!(err, Error::MissingCommand(ref name) if name == "surya"));
        assert_eq!(shell.seen(), ["command -v forge", "command -v surya"]);
    }

    #[test]
    fn storage_read_keeps_rpc_url_out_of_command() {
        let word = "0x00000000000000000000000043506849d7c04f9138d1a2050bbf3a0c054402dd";
        let stdout = format!("{word}\n");
        let shell = ScriptedShell::new(vec![(0, stdout.as_str(), "")]);
        let slot = crate::proxy::IMPLEMENTATION_SLOT;
        let out = Toolchain::new(&shell).storage_at(&addr(), slot).unwrap();
        assert_eq!(out, word);
        assert_eq!(
            shell.seen()[0],
            format!(
                "cast storage 0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48 {slot} \
                 --rpc-url \"$ETH_RPC_URL\""
            )
        );
    }

    #[test]
    fn non_zero_exit_fails_fast() {
        let shell = ScriptedShell::new(vec![(2, "", "error: invalid project\n")]);
        let err = Toolchain::new(&shell).forge_init(Path::new("Vault")).unwrap_err();
        match err {
            Error::CommandFailed { command, status, stderr } => {
                assert_eq!(command, "forge init Vault --no-git --quiet");
                assert_eq!(status, 2);
                assert_eq!(stderr, "error: invalid project");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn checksum_parses_cast_output() {
        let shell =
            ScriptedShell::new(vec![(0, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48\n", "")]);
        let sum = Toolchain::new(&shell).checksum(&addr()).unwrap();
        assert_eq!(sum.as_str(), "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    }

    #[test]
    fn checksum_rejects_garbage() {
        let shell = ScriptedShell::new(vec![(0, "Error\n", "")]);
        let err = Toolchain::new(&shell).checksum(&addr()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedOutput { .. }));
    }

    #[test]
    fn storage_diagram_command_line() {
        let shell = ScriptedShell::new(vec![(0, "", "")]);
        Toolchain::new(&shell)
            .storage_diagram(
                Path::new("My Vault/src"),
                "Vault",
                &addr(),
                Path::new("My Vault/assets/storage-layout.svg"),
            )
            .unwrap();
        assert_eq!(
            shell.seen()[0],
            "sol2uml storage 'My Vault/src' -c Vault -d 0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48 \
             -u \"$ETH_RPC_URL\" -o 'My Vault/assets/storage-layout.svg'"
        );
    }
}
