use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use portr_common::error::ScanError;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Resolves `host` to the single address every probe of a scan will use.
///
/// IP literals are returned as-is. For names, the first IPv4 answer is
/// preferred, falling back to the first IPv6 one.
pub async fn resolve_target(host: &str, limit: Duration) -> Result<IpAddr, ScanError> {
    let host: &str = host.trim();
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let failure = |reason: String| {
        warn!("Resolution of {host} failed: {reason}");
        ScanError::Resolution {
            host: host.to_string(),
            reason,
        }
    };

    let addrs: Vec<SocketAddr> = match timeout(limit, lookup_host((host, 0))).await {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(err)) => return Err(failure(err.to_string())),
        Err(_elapsed) => {
            return Err(failure(format!(
                "lookup timed out after {}ms",
                limit.as_millis()
            )));
        }
    };

    let chosen: Option<IpAddr> = addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .map(SocketAddr::ip);

    match chosen {
        Some(ip) => {
            debug!("Resolved {host} to {ip} ({} candidates)", addrs.len());
            Ok(ip)
        }
        None => Err(failure("no addresses found".into())),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
