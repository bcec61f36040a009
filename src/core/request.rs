use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const UNKNOWN_IP: &str = "unknown";

// Shape checks only; octet ranges are not validated.
static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("valid IPv4 pattern"));
static IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-fA-F]{0,4}:){2,7}[0-9a-fA-F]{0,4}$").expect("valid IPv6 pattern")
});

pub fn is_valid_ip(candidate: &str) -> bool {
    IPV4.is_match(candidate) || IPV6.is_match(candidate)
}

fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

/// Client address as reported by the proxy chain.
///
/// Checks `x-forwarded-for` (first hop), `x-real-ip`, then `cf-connecting-ip`.
pub fn extract_client_ip(headers: &HashMap<String, String>) -> String {
    if let Some(forwarded) = header(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next().map(str::trim) {
            if is_valid_ip(first) {
                return first.to_string();
            }
        }
    }

    for name in ["x-real-ip", "cf-connecting-ip"] {
        if let Some(value) = header(headers, name) {
            if is_valid_ip(value) {
                return value.to_string();
            }
        }
    }

    UNKNOWN_IP.to_string()
}

/// Truncated SHA-256 of the lower-cased address, safe to store in audit logs.
pub fn hash_email(email: &str) -> String {
    let digest = Sha256::digest(email.to_lowercase().as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(16);
    encoded
}
