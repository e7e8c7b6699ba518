//! Scaffold test and remappings generation.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Error, Result};
use crate::flatten::FlatFile;
use crate::ports::FileSystem;

/// Remappings written next to `foundry.toml`.
pub const REMAPPINGS: &str = "forge-std/=lib/forge-std/src/\n";

/// Errors raised while generating the scaffold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScaffoldError {
    /// The primary contract has no `pragma solidity` line.
    #[error("{} has no `pragma solidity` line", .0.display())]
    MissingPragma(PathBuf),

    /// No downloaded file declares the verified contract.
    #[error("no downloaded source declares contract `{0}`")]
    PrimaryNotFound(String),
}

/// Values interpolated into the test template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestParams<'a> {
    /// Primary contract name.
    pub contract_name: &'a str,
    /// File under `src/` that declares the contract.
    pub primary_file: &'a str,
    /// Version constraint copied from the primary contract.
    pub pragma_version: &'a str,
    /// Checksummed address the test binds the contract to.
    pub target: &'a str,
    /// Environment variable holding the fork RPC URL.
    pub rpc_env_var: &'a str,
}

/// Returns the version constraint of the first `pragma solidity` line.
///
/// The constraint is passed through verbatim (`^0.8.19`, `>=0.8.0 <0.9.0`).
#[must_use]
pub fn find_pragma_version(source: &str) -> Option<&str> {
    source.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix("pragma solidity")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let version = rest.split(';').next()?.trim();
        (!version.is_empty()).then_some(version)
    })
}

/// Path of the generated test, relative to the project root.
#[must_use]
pub fn test_path(contract_name: &str) -> PathBuf {
    Path::new("test").join(format!("{contract_name}.t.sol"))
}

/// Renders the fork-based proof-of-concept test.
#[must_use]
pub fn render_test(params: &TestParams<'_>) -> String {
    let TestParams { contract_name: name, primary_file, pragma_version, target, rpc_env_var } =
        params;
    format!(
        r#"// SPDX-License-Identifier: UNLICENSED
pragma solidity {pragma_version};

import "forge-std/Test.sol";
import "../src/{primary_file}";

contract {name}PoC is Test {{
    {name} internal target;

    function setUp() public {{
        vm.createSelectFork(vm.envString("{rpc_env_var}"));
        target = {name}(payable({target}));
    }}

    function testSetup() public {{
        assertEq(address(target), {target});
    }}
}}
"#
    )
}

/// Picks the file declaring `contract_name` among the flattened sources.
///
/// `<contract_name>.sol` wins; otherwise the first file with a matching
/// `contract`, `abstract contract`, `library` or `interface` declaration.
#[must_use]
pub fn locate_primary<'f>(files: &'f [FlatFile], contract_name: &str) -> Option<&'f FlatFile> {
    let expected = format!("{contract_name}.sol");
    files.iter().find(|f| f.name == expected).or_else(|| {
        let decl = Regex::new(&format!(
            r"(?m)^\s*(?:abstract\s+)?(?:contract|library|interface)\s+{}\b",
            regex::escape(contract_name)
        ))
        .ok()?;
        files.iter().find(|f| decl.is_match(&f.contents))
    })
}

/// Renders the test for the contract defined in `src/<primary_file>` and
/// writes it together with `remappings.txt`. Returns the test's path.
///
/// # Errors
///
/// Returns [`ScaffoldError::MissingPragma`] if the primary file declares no
/// compiler version, or an I/O error.
pub fn write_scaffold(
    fs: &dyn FileSystem,
    project: &Path,
    primary_file: &str,
    contract_name: &str,
    target: &str,
    rpc_env_var: &str,
) -> Result<PathBuf> {
    let primary = project.join("src").join(primary_file);
    let source = fs
        .read_to_string(&primary)
        .map_err(|e| Error::io(format!("failed to read {}", primary.display()), e))?;
    let pragma_version =
        find_pragma_version(&source).ok_or_else(|| ScaffoldError::MissingPragma(primary.clone()))?;

    let test = render_test(&TestParams {
        contract_name,
        primary_file,
        pragma_version,
        target,
        rpc_env_var,
    });
    let test_file = project.join(test_path(contract_name));
    fs.write(&test_file, &test)
        .map_err(|e| Error::io(format!("failed to write {}", test_file.display()), e))?;

    let remappings = project.join("remappings.txt");
    fs.write(&remappings, REMAPPINGS)
        .map_err(|e| Error::io(format!("failed to write {}", remappings.display()), e))?;

    tracing::info!(test = %test_file.display(), pragma = pragma_version, "wrote scaffold test");
    Ok(test_file)
}
