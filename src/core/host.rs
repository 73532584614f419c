//! Host address discovery

use std::io;
use std::net::{IpAddr, Ipv4Addr};

/// First non-loopback IPv4 address among the host's network interfaces
pub fn local_ipv4() -> io::Result<Option<Ipv4Addr>> {
    let interfaces = if_addrs::get_if_addrs()?;
    Ok(first_non_loopback_ipv4(
        interfaces.iter().map(|interface| interface.ip()),
    ))
}

/// Pick the first IPv4 address that is not a loopback address
pub fn first_non_loopback_ipv4<I>(addrs: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = IpAddr>,
{
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
        _ => None,
    })
}

/// Resolve the host IP as a string, empty when none is found.
///
/// Enumeration failures are reported on stderr and are not fatal.
pub fn resolve_host_ip() -> String {
    match local_ipv4() {
        Ok(Some(ip)) => ip.to_string(),
        Ok(None) => String::new(),
        Err(e) => {
            eprintln!("[LOGGER WARNING] Failed to enumerate network interfaces: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn test_skips_loopback_and_ipv6() {
        let addrs = vec![
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(192, 168, 10, 24)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)),
        ];
        assert_eq!(
            first_non_loopback_ipv4(addrs),
            Some(Ipv4Addr::new(192, 168, 10, 24))
        );
    }

    #[test]
    fn test_only_loopback() {
        let addrs = vec![IpAddr::V4(Ipv4Addr::LOCALHOST), IpAddr::V6(Ipv6Addr::LOCALHOST)];
        assert_eq!(first_non_loopback_ipv4(addrs), None);
    }

    #[test]
    fn test_resolve_host_ip_is_dotted_quad_or_empty() {
        let ip = resolve_host_ip();
        assert!(ip.is_empty() || ip.parse::<Ipv4Addr>().is_ok(), "got {}", ip);
    }
}
