//! Frozen 4-byte method selector table
//!
//! The inward-facing API is addressable by the first four bytes of the
//! Keccak-256 hash of each method signature. Existing clients depend on
//! these exact values, so the table is frozen and pinned by tests.

use sha3::{Digest, Keccak256};

/// Keccak-256 convenience wrapper.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// 4-byte selector of an ABI method signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Every public method signature, paired with its frozen selector.
pub const METHOD_SIGNATURES: &[(&str, [u8; 4])] = &[
    ("approve(address)", [0xda, 0xea, 0x85, 0xc5]),
    ("checkRetiredsApproved()", [0x96, 0x6e, 0x07, 0x94]),
    ("finalizeApproval()", [0xfa, 0xaf, 0x9c, 0xa6]),
    ("finalizeContract(string)", [0xea, 0x6d, 0x4a, 0x9b]),
    ("finalizeRegistration()", [0x48, 0x40, 0x90, 0x96]),
    ("getNewbie(address)", [0xeb, 0x5a, 0x8e, 0x55]),
    ("getNewbieCount()", [0x91, 0x73, 0x4d, 0x86]),
    ("getNewbieIndex(address)", [0x11, 0xf5, 0xc4, 0x66]),
    ("getRetired(address)", [0xbf, 0x68, 0x05, 0x90]),
    ("getRetiredCount()", [0xd1, 0xed, 0x33, 0xfc]),
    ("getRetiredIndex(address)", [0x68, 0x1f, 0x6e, 0x7c]),
    ("getTreasuryAmount()", [0xe2, 0x0f, 0xcf, 0x00]),
    ("isContractAddr(address)", [0xe2, 0x38, 0x4c, 0xb3]),
    ("isOwner()", [0x8f, 0x32, 0xd5, 0x9b]),
    ("memo()", [0x58, 0xc3, 0xb8, 0x70]),
    ("newbieExists(address)", [0x68, 0x3e, 0x13, 0xcb]),
    ("newbies(uint256)", [0x94, 0x39, 0x3e, 0x11]),
    ("owner()", [0x8d, 0xa5, 0xcb, 0x5b]),
    ("rebalanceBlockNumber()", [0x49, 0xa3, 0xfb, 0x45]),
    ("registerNewbie(address,uint256)", [0x65, 0x2e, 0x27, 0xe0]),
    ("registerRetired(address)", [0x1f, 0x8c, 0x17, 0x98]),
    ("removeNewbie(address)", [0x68, 0x64, 0xb9, 0x5b]),
    ("removeRetired(address)", [0x1c, 0x1d, 0xac, 0x59]),
    ("renounceOwnership()", [0x71, 0x50, 0x18, 0xa6]),
    ("reset()", [0xd8, 0x26, 0xf8, 0x8f]),
    ("retiredExists(address)", [0x01, 0x78, 0x4e, 0x05]),
    ("retirees(uint256)", [0x5a, 0x12, 0x66, 0x7b]),
    ("status()", [0x20, 0x0d, 0x2e, 0xd2]),
    ("sumOfRetiredBalance()", [0x45, 0x20, 0x5a, 0x6b]),
    ("transferOwnership(address)", [0xf2, 0xfd, 0xe3, 0x8b]),
];

/// The probe method contract retirees must expose, returning
/// `(address[] adminList, uint256 quorum)`.
pub const GET_STATE_SIGNATURE: &str = "getState()";
pub const GET_STATE_SELECTOR: [u8; 4] = [0x18, 0x65, 0xc5, 0x7d];

/// Reverse lookup: signature for a known selector.
pub fn method_by_selector(sel: [u8; 4]) -> Option<&'static str> {
    METHOD_SIGNATURES
        .iter()
        .find(|(_, s)| *s == sel)
        .map(|(sig, _)| *sig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_match_keccak() {
        // The frozen table must agree with the hash derivation.
        for (sig, frozen) in METHOD_SIGNATURES {
            assert_eq!(selector(sig), *frozen, "selector mismatch for {sig}");
        }
    }

    #[test]
    fn test_get_state_selector() {
        assert_eq!(selector(GET_STATE_SIGNATURE), GET_STATE_SELECTOR);
    }

    #[test]
    fn test_method_by_selector() {
        assert_eq!(
            method_by_selector([0x1f, 0x8c, 0x17, 0x98]),
            Some("registerRetired(address)")
        );
        assert_eq!(method_by_selector([0xde, 0xad, 0xbe, 0xef]), None);
    }

    #[test]
    fn test_no_selector_collisions() {
        for (i, (_, a)) in METHOD_SIGNATURES.iter().enumerate() {
            for (_, b) in &METHOD_SIGNATURES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
