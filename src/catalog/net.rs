//! Address and e-mail checks.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

use super::Catalog;

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$")
        .map_err(|err| tracing::error!(error = %err, "Invalid e-mail pattern"))
        .ok()
});

pub fn is_valid_ipv4_address(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

pub fn is_valid_ipv6_address(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

/// Either family; each element is judged on its own.
pub fn is_valid_ip_address(s: &str) -> bool {
    is_valid_ipv4_address(s) || is_valid_ipv6_address(s)
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(s))
}

pub(super) fn register(catalog: &mut Catalog) {
    catalog.register_check(
        "ip_is_valid_ipv4",
        is_valid_ipv4_address,
        "Invalid IPv4 address",
        "Invalid IPv4 addresses",
    );
    catalog.register_check(
        "ip_is_valid_ipv6",
        is_valid_ipv6_address,
        "Invalid IPv6 address",
        "Invalid IPv6 addresses",
    );
    catalog.register_check(
        "ip_is_valid",
        is_valid_ip_address,
        "Invalid IP address",
        "Invalid IP addresses",
    );
    catalog.register_check(
        "email_is_valid",
        is_valid_email,
        "Invalid email address",
        "Invalid email addresses",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_families() {
        assert!(is_valid_ipv4_address("192.168.0.1"));
        assert!(!is_valid_ipv4_address("::1"));
        assert!(is_valid_ipv6_address("::1"));
        assert!(!is_valid_ipv6_address("10.0.0.1"));
        assert!(is_valid_ip_address("10.0.0.1"));
        assert!(is_valid_ip_address("fe80::1"));
        assert!(!is_valid_ip_address("300.1.1.1"));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("dev.ops+alerts@example.co.uk"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("user@nodot"));
    }
}
