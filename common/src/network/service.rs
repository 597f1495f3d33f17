//! Static well-known port table.
//!
//! Read-only and process-wide; lookups need no synchronization.

/// Name reported for any port missing from the table.
pub const UNKNOWN_SERVICE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEntry {
    pub port: u16,
    pub protocol: &'static str,
    pub name: &'static str,
}

const fn tcp(port: u16, name: &'static str) -> ServiceEntry {
    ServiceEntry {
        port,
        protocol: "tcp",
        name,
    }
}

// Must stay sorted by port, `lookup` binary-searches it.
static SERVICES: &[ServiceEntry] = &[
    tcp(20, "ftp-data"),
    tcp(21, "ftp"),
    tcp(22, "ssh"),
    tcp(23, "telnet"),
    tcp(25, "smtp"),
    tcp(53, "dns"),
    tcp(67, "dhcp"),
    tcp(69, "tftp"),
    tcp(80, "http"),
    tcp(88, "kerberos"),
    tcp(110, "pop3"),
    tcp(111, "rpcbind"),
    tcp(119, "nntp"),
    tcp(123, "ntp"),
    tcp(135, "msrpc"),
    tcp(139, "netbios-ssn"),
    tcp(143, "imap"),
    tcp(161, "snmp"),
    tcp(179, "bgp"),
    tcp(389, "ldap"),
    tcp(443, "https"),
    tcp(445, "microsoft-ds"),
    tcp(465, "smtps"),
    tcp(514, "syslog"),
    tcp(587, "submission"),
    tcp(631, "ipp"),
    tcp(636, "ldaps"),
    tcp(873, "rsync"),
    tcp(993, "imaps"),
    tcp(995, "pop3s"),
    tcp(1080, "socks"),
    tcp(1433, "mssql"),
    tcp(1521, "oracle"),
    tcp(1723, "pptp"),
    tcp(1883, "mqtt"),
    tcp(2049, "nfs"),
    tcp(2375, "docker"),
    tcp(3000, "grafana"),
    tcp(3306, "mysql"),
    tcp(3389, "rdp"),
    tcp(5060, "sip"),
    tcp(5432, "postgresql"),
    tcp(5601, "kibana"),
    tcp(5672, "amqp"),
    tcp(5900, "vnc"),
    tcp(6000, "x11"),
    tcp(6379, "redis"),
    tcp(6443, "kubernetes-api"),
    tcp(8080, "http-alt"),
    tcp(8443, "https-alt"),
    tcp(9090, "prometheus"),
    tcp(9100, "node-exporter"),
    tcp(9200, "elasticsearch"),
    tcp(11211, "memcached"),
    tcp(27015, "steam"),
    tcp(27017, "mongodb"),
];

/// Returns the conventional service name for `port`, or `"unknown"`.
pub fn lookup(port: u16) -> &'static str {
    entry(port).map_or(UNKNOWN_SERVICE, |entry| entry.name)
}

pub fn entry(port: u16) -> Option<&'static ServiceEntry> {
    SERVICES
        .binary_search_by_key(&port, |entry| entry.port)
        .ok()
        .map(|idx| &SERVICES[idx])
}

pub fn entries() -> &'static [ServiceEntry] {
    SERVICES
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
