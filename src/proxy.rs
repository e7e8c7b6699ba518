//! Proxy resolution from the EIP-1967 implementation slot.

use crate::address::Address;

/// `bytes32(uint256(keccak256("eip1967.proxy.implementation")) - 1)`.
pub const IMPLEMENTATION_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// Which contract holds the code and which holds the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResolution {
    /// Contract whose source is downloaded and whose type the test uses.
    pub logic: Address,
    /// Contract the test talks to on the fork.
    pub data: Address,
}

impl ProxyResolution {
    /// Resolution for a contract that is not behind a proxy.
    #[must_use]
    pub fn direct(address: Address) -> Self {
        Self { logic: address.clone(), data: address }
    }

    /// Returns `true` when logic and data live at different addresses.
    #[must_use]
    pub fn is_proxy(&self) -> bool {
        !self.logic.same_as(&self.data)
    }
}

/// Decodes the address stored in a 32-byte storage word.
///
/// Returns `None` for an all-zero word. The address is the low 20 bytes.
///
/// # Errors
///
/// Returns a description of the problem if `word` is not 32 bytes of hex.
pub fn decode_slot_address(word: &str) -> Result<Option<Address>, String> {
    let word = word.trim();
    let hex = word.strip_prefix("0x").unwrap_or(word);
    if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected a 32-byte hex word, got {word:?}"));
    }
    if hex.bytes().all(|b| b == b'0') {
        return Ok(None);
    }
    format!("0x{}", &hex[24..]).parse::<Address>().map(Some).map_err(|e| e.to_string())
}

/// Resolves `input` given the raw contents of its implementation slot.
///
/// # Errors
///
/// Returns a description of the problem if `slot_word` is malformed.
pub fn resolve(input: &Address, slot_word: &str) -> Result<ProxyResolution, String> {
    Ok(match decode_slot_address(slot_word)? {
        None => ProxyResolution::direct(input.clone()),
        Some(logic) => ProxyResolution { logic, data: input.clone() },
    })
}
