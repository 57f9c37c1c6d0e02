//! Thai mobile number validation.

use std::sync::LazyLock;

use regex::Regex;

/// A leading `0` followed by eight or nine digits (nine or ten in total), or
/// the same subscriber digits after `+66` in place of the `0`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+66|0)\d{8,9}$").expect("phone pattern is valid"));

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}
