//! Stable short identity for a resource locator.
//!
//! The identity doubles as the registry dedup key and as the fallback
//! file-name stem. It is a 32-bit rolling hash of the locator rendered in
//! base-36, so identical locators always map to the same identity.
//! Collisions between distinct locators are possible in a 32-bit space and
//! are tolerated (see DESIGN.md).

use std::fmt;

/// Deterministic fingerprint of a locator, rendered base-36.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferIdentity(String);

impl TransferIdentity {
    /// Derives the identity for `locator`. Pure and total: any string input
    /// yields a valid identity.
    pub fn of(locator: &str) -> Self {
        // h = h*31 + code unit, wrapping at 32 bits. Runs over UTF-16 code
        // units so the result is independent of how the locator was encoded.
        let mut h: i32 = 0;
        for unit in locator.encode_utf16() {
            h = h.wrapping_mul(31).wrapping_add(unit as i32);
        }
        TransferIdentity(to_base36(h as u32))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransferIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase base-36 rendering of `n` ("0" for zero).
fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = [0u8; 7]; // u32::MAX in base 36 is 7 digits ("1z141z3")
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    String::from_utf8_lossy(&buf[i..]).into_owned()
}
