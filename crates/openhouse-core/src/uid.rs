//! Human-readable user identifiers.
//!
//! A UID is two uppercase ASCII letters followed by eight decimal digits,
//! e.g. `QX04718265`. Generation is not cryptographically secure; uniqueness
//! is checked against the store by the caller.

use rand::Rng;

pub const UID_LETTERS: usize = 2;
pub const UID_DIGITS: usize = 8;

/// Generates a UID from the thread-local RNG.
pub fn generate_uid() -> String {
    generate_uid_with(&mut rand::thread_rng())
}

/// Generates a UID from the given randomness source.
pub fn generate_uid_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut uid = String::with_capacity(UID_LETTERS + UID_DIGITS);
    for _ in 0..UID_LETTERS {
        uid.push((b'A' + rng.gen_range(0..26u8)) as char);
    }
    for _ in 0..UID_DIGITS {
        uid.push((b'0' + rng.gen_range(0..10u8)) as char);
    }
    uid
}

/// Whether `value` has the UID shape.
pub fn is_valid_uid(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == UID_LETTERS + UID_DIGITS
        && bytes[..UID_LETTERS].iter().all(u8::is_ascii_uppercase)
        && bytes[UID_LETTERS..].iter().all(u8::is_ascii_digit)
}
