//! Default gateway discovery
//!
//! Used by `update` to skip runs while away from the home network. On Linux
//! the default route is read from `/proc/net/route`; other platforms report
//! an error, which is fatal only when a home gateway is configured.

use std::net::Ipv4Addr;

use dyndns_core::{Error, Result};

/// Route is usable
const RTF_UP: u32 = 0x0001;
/// Destination is reached through a gateway
const RTF_GATEWAY: u32 = 0x0002;
const DEFAULT_ROUTE_FLAGS: u32 = RTF_UP | RTF_GATEWAY;

#[cfg(target_os = "linux")]
const ROUTE_TABLE: &str = "/proc/net/route";

/// Discover the IPv4 default gateway of this host
#[cfg(target_os = "linux")]
pub fn discover() -> Result<Ipv4Addr> {
    let table = std::fs::read_to_string(ROUTE_TABLE)?;
    parse_route_table(&table)
        .ok_or_else(|| Error::config(format!("No default gateway found in {ROUTE_TABLE}")))
}

#[cfg(not(target_os = "linux"))]
pub fn discover() -> Result<Ipv4Addr> {
    Err(Error::config(
        "Gateway discovery is only supported on Linux; remove main.home_gateway",
    ))
}

/// Whether the discovered gateway is the configured home gateway
pub fn is_home(home_gateway: &str, current: Ipv4Addr) -> bool {
    home_gateway.trim() == current.to_string()
}

/// Pick the default route with the lowest metric from a `/proc/net/route` dump
///
/// ```text
/// Iface  Destination  Gateway   Flags  RefCnt  Use  Metric  Mask      MTU  Window  IRTT
/// eth0   00000000     0101A8C0  0003   0       0    100     00000000  0    0       0
/// ```
///
/// Addresses are hex in host (little-endian) byte order.
pub fn parse_route_table(table: &str) -> Option<Ipv4Addr> {
    table
        .lines()
        .skip(1)
        .filter_map(parse_route)
        .filter(|route| {
            route.destination == 0 && (route.flags & DEFAULT_ROUTE_FLAGS) == DEFAULT_ROUTE_FLAGS
        })
        .min_by_key(|route| route.metric)
        .map(|route| Ipv4Addr::from(route.gateway.to_le_bytes()))
}

struct Route {
    destination: u32,
    gateway: u32,
    flags: u32,
    metric: u32,
}

fn parse_route(line: &str) -> Option<Route> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return None;
    }

    Some(Route {
        destination: u32::from_str_radix(fields[1], 16).ok()?,
        gateway: u32::from_str_radix(fields[2], 16).ok()?,
        flags: u32::from_str_radix(fields[3], 16).ok()?,
        metric: fields[6].parse().ok()?,
    })
}
