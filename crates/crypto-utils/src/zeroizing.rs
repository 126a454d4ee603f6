use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A `String` wrapper that is zeroed when dropped and never printed.
///
/// Holds hex-encoded private keys between the configuration layer and the
/// key parser, and the exported key shown once by `create-account`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ZeroizingString(String);

impl ZeroizingString {
    pub fn new(data: String) -> Self {
        Self(data)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for ZeroizingString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ZeroizingString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZeroizingString([REDACTED])")
    }
}

impl From<String> for ZeroizingString {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for ZeroizingString {
    fn from(data: &str) -> Self {
        Self::new(data.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deref_exposes_contents() {
        let zs = ZeroizingString::new("0xdeadbeef".to_string());
        assert_eq!(&*zs, "0xdeadbeef");
        assert!(zs.starts_with("0x"));
    }

    #[test]
    fn len_and_is_empty() {
        let zs = ZeroizingString::from("abc");
        assert_eq!(zs.len(), 3);
        assert!(!zs.is_empty());
        assert!(ZeroizingString::new(String::new()).is_empty());
    }

    #[test]
    fn debug_never_prints_secret() {
        let zs = ZeroizingString::from("4646464646464646");
        let debug = format!("{zs:?}");
        assert!(!debug.contains("4646"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn manual_zeroize_clears() {
        let mut zs = ZeroizingString::from("sensitive");
        zs.zeroize();
        assert!(zs.is_empty());
    }
}
