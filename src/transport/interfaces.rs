//! Network interface enumeration and initial selection.

use crate::common::AppError;
use std::net::Ipv4Addr;

const LOOPBACK_NAME: &str = "lo";

/// Interface name plus its first IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    pub ipv4: Ipv4Addr,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>, ipv4: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            ipv4,
        }
    }
}

/// Lists interfaces in OS enumeration order, one entry per interface name.
/// Interfaces without an IPv4 address are left out.
pub fn list_interfaces() -> Result<Vec<NetworkInterface>, AppError> {
    let addrs = if_addrs::get_if_addrs().map_err(AppError::Enumeration)?;

    let mut interfaces: Vec<NetworkInterface> = Vec::new();
    for iface in addrs {
        let if_addrs::IfAddr::V4(v4) = iface.addr else {
            continue;
        };
        if interfaces.iter().any(|known| known.name == iface.name) {
            continue;
        }
        interfaces.push(NetworkInterface::new(iface.name, v4.ip));
    }

    tracing::debug!(count = interfaces.len(), "enumerated interfaces");
    Ok(interfaces)
}

/// Picks the interface to start on: first `eth<N>`/`wlan<N>`, else the first
/// non-loopback interface, else index 0.
pub fn initial_index(interfaces: &[NetworkInterface]) -> usize {
    if let Some(i) = interfaces
        .iter()
        .position(|iface| is_numbered(&iface.name, "eth") || is_numbered(&iface.name, "wlan"))
    {
        return i;
    }

    interfaces
        .iter()
        .position(|iface| iface.name != LOOPBACK_NAME && !iface.ipv4.is_loopback())
        .unwrap_or(0)
}

/// `eth0`, `wlan12`; not `eth`, `eth0a`, `veth0`.
fn is_numbered(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}
