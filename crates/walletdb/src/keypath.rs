//! Hierarchical-deterministic keypath model.
//!
//! Two fixed layouts exist: the legacy 4-level path (`m/0'/0/5`) and the
//! BIP44 6-level path (`m/44'/136'/0'/0/5`). Role assignment is strictly
//! positional; the layout is chosen by the second component being `44'`, and
//! a path whose depth matches neither layout is rejected outright rather
//! than guessed at.

use std::fmt;

pub const LEGACY_DEPTH: usize = 4;
pub const BIP44_DEPTH: usize = 6;

/// Value sentinel for components that carry no parseable integer (the root
/// `m`, or malformed digits).
pub const UNPARSEABLE: i64 = -1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeypathRole {
    Master,
    Purpose,
    CoinType,
    Account,
    Change,
    ExternalChainChild,
    Child,
}

const LEGACY_ROLES: [KeypathRole; LEGACY_DEPTH] = [
    KeypathRole::Master,
    KeypathRole::Account,
    KeypathRole::ExternalChainChild,
    KeypathRole::Child,
];

const BIP44_ROLES: [KeypathRole; BIP44_DEPTH] = [
    KeypathRole::Master,
    KeypathRole::Purpose,
    KeypathRole::CoinType,
    KeypathRole::Account,
    KeypathRole::Change,
    KeypathRole::Child,
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Component {
    raw: String,
    value: i64,
    hardened: bool,
    depth: usize,
    role: KeypathRole,
}

impl Component {
    fn new(raw: &str, depth: usize, role: KeypathRole) -> Self {
        let hardened = raw.len() > 1 && raw.ends_with('\'');
        let digits = if hardened {
            &raw[..raw.len() - 1]
        } else {
            raw
        };
        let value = if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            digits.parse::<i64>().unwrap_or(UNPARSEABLE)
        } else {
            UNPARSEABLE
        };
        Self {
            raw: raw.to_string(),
            value,
            hardened,
            depth,
            role,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn role(&self) -> KeypathRole {
        self.role
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeypathError {
    /// The path is just the root component.
    Root,
    /// Token count matches no known layout.
    UnresolvedDepth { found: usize, expected: usize },
}

impl fmt::Display for KeypathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeypathError::Root => write!(f, "keypath is the bare root"),
            KeypathError::UnresolvedDepth { found, expected } => {
                write!(f, "keypath depth {found} does not match layout depth {expected}")
            }
        }
    }
}

impl std::error::Error for KeypathError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HdKeypath {
    Legacy(Vec<Component>),
    Bip44(Vec<Component>),
}

impl HdKeypath {
    pub fn parse(path: &str) -> Result<Self, KeypathError> {
        if path == "m" {
            return Err(KeypathError::Root);
        }
        let tokens: Vec<&str> = path.split('/').collect();
        if tokens.get(1).copied() == Some("44'") {
            if tokens.len() != BIP44_DEPTH {
                return Err(KeypathError::UnresolvedDepth {
                    found: tokens.len(),
                    expected: BIP44_DEPTH,
                });
            }
            let components = tokens
                .iter()
                .zip(BIP44_ROLES)
                .enumerate()
                .map(|(depth, (raw, role))| Component::new(raw, depth, role))
                .collect();
            Ok(HdKeypath::Bip44(components))
        } else {
            if tokens.len() != LEGACY_DEPTH {
                return Err(KeypathError::UnresolvedDepth {
                    found: tokens.len(),
                    expected: LEGACY_DEPTH,
                });
            }
            let components = tokens
                .iter()
                .zip(LEGACY_ROLES)
                .enumerate()
                .map(|(depth, (raw, role))| Component::new(raw, depth, role))
                .collect();
            Ok(HdKeypath::Legacy(components))
        }
    }

    pub fn components(&self) -> &[Component] {
        match self {
            HdKeypath::Legacy(components) | HdKeypath::Bip44(components) => components,
        }
    }

    /// Look a component up by its semantic role rather than its depth.
    pub fn component(&self, role: KeypathRole) -> Option<&Component> {
        self.components().iter().find(|c| c.role() == role)
    }

    pub fn child(&self) -> Option<&Component> {
        self.component(KeypathRole::Child)
    }
}

impl fmt::Display for HdKeypath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, component) in self.components().iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            f.write_str(component.raw())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_roles_are_positional() {
        let path = HdKeypath::parse("m/0'/0/5").unwrap();
        assert!(matches!(path, HdKeypath::Legacy(_)));
        let account = path.component(KeypathRole::Account).unwrap();
        assert_eq!(account.value(), 0);
        assert!(account.is_hardened());
        let child = path.child().unwrap();
        assert_eq!(child.value(), 5);
        assert!(!child.is_hardened());
    }

    #[test]
    fn bip44_selected_by_purpose_component() {
        let path = HdKeypath::parse("m/44'/136'/0'/2/17").unwrap();
        assert!(matches!(path, HdKeypath::Bip44(_)));
        assert_eq!(path.component(KeypathRole::CoinType).unwrap().value(), 136);
        assert_eq!(path.component(KeypathRole::Change).unwrap().value(), 2);
        assert_eq!(path.child().unwrap().value(), 17);
    }

    #[test]
    fn depth_mismatch_is_rejected() {
        assert!(HdKeypath::parse("m/0'/0").is_err());
        assert!(HdKeypath::parse("m/0'/0/1/2").is_err());
        // BIP44 purpose with legacy depth is not guessed at.
        assert!(HdKeypath::parse("m/44'/136'/0'").is_err());
        assert!(HdKeypath::parse("m").is_err());
    }

    #[test]
    fn root_component_is_unparseable() {
        let path = HdKeypath::parse("m/0'/0/5").unwrap();
        let master = path.component(KeypathRole::Master).unwrap();
        assert_eq!(master.value(), UNPARSEABLE);
        assert!(!master.is_hardened());
        assert_eq!(master.depth(), 0);
    }

    #[test]
    fn malformed_digits_keep_sentinel() {
        let path = HdKeypath::parse("m/x9'/0/5").unwrap();
        assert_eq!(path.component(KeypathRole::Account).unwrap().value(), UNPARSEABLE);
        assert!(path.component(KeypathRole::Account).unwrap().is_hardened());
    }

    #[test]
    fn round_trip_is_byte_identical() {
        for raw in ["m/0'/0/5", "m/44'/136'/0'/0/5", "m/1'/7/0", "m/44'/1'/3'/2/9"] {
            let path = HdKeypath::parse(raw).unwrap();
            assert_eq!(path.to_string(), raw);
        }
    }
}
