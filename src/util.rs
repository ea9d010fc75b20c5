//! Internal utilities.

use std::net::Ipv4Addr;

/// Checks whether `s` is a dotted-quad IPv4 literal such as `192.168.1.1`.
///
/// Each of the four octets must be a decimal number in `0..=255`. IPv6
/// literals, bracketed forms and hostnames are never treated as addresses.
#[must_use]
pub fn is_ipv4_literal(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}
