//! Concrete pipeline stages, one module per step, in ordinal order:
//! subdomain enumeration, takeover check, cors scan, dns resolution,
//! screenshot capture, content discovery, port scan, service
//! enumeration.

pub mod content;
pub mod cors;
pub mod dns;
pub mod portscan;
pub mod screenshots;
pub mod services;
pub mod subdomains;
pub mod takeover;
