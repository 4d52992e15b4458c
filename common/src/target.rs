//! # Sweep Target Model
//!
//! Defines the single input of a sweep: a validated domain name.
//!
//! Parsing is deliberately conservative. Accepting a loose string here
//! means handing it to half a dozen external tools later, so anything
//! that is not a plain DNS name (schemes, paths, ports, whitespace,
//! bare TLDs) is rejected before any process is spawned.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Longest label the DNS allows.
const MAX_LABEL_LEN: usize = 63;

/// A validated target domain. Immutable for the whole run; every
/// workspace path and tool invocation is derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target(String);

impl Target {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `hostname` is the target itself or a subdomain of it.
    pub fn owns(&self, hostname: &str) -> bool {
        hostname == self.0 || hostname.ends_with(&format!(".{}", self.0))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Target {
    type Err = Error;

    /// Parses and validates a domain name.
    ///
    /// Accepted: dot-separated labels of letters, digits and hyphens,
    /// with a purely alphabetic TLD of at least two characters.
    /// Rejected: whitespace, scheme prefixes, leading/trailing dots,
    /// empty labels, single-label names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();

        if lower.is_empty() {
            return Err(Error::InvalidInput("empty domain".into()));
        }
        if lower.contains("://") {
            return Err(Error::InvalidInput(format!(
                "'{s}' looks like a URL, expected a bare domain"
            )));
        }
        if !is_valid_domain(&lower) {
            return Err(Error::InvalidInput(format!("invalid domain: {s}")));
        }

        Ok(Target(lower))
    }
}

/// Validates a full domain name: at least two labels, every label
/// well-formed, TLD alphabetic and at least two characters long.
pub fn is_valid_domain(s: &str) -> bool {
    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if !labels.iter().all(|l| is_valid_label(l)) {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Validates a hostname as produced by enumeration tools. Same label
/// grammar as [`is_valid_domain`] but without the TLD check, since the
/// suffix is enforced separately against the target.
pub fn is_valid_hostname(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_domains() {
        assert!(Target::from_str("example.com").is_ok());
        assert!(Target::from_str("sub.example.com").is_ok());
        assert!(Target::from_str("ex-ample.co.uk").is_ok());
        assert!(Target::from_str("123.example.io").is_ok());
    }

    #[test]
    fn test_lowercases_input() {
        let t = Target::from_str("Example.COM").unwrap();
        assert_eq!(t.as_str(), "example.com");
    }

    #[test]
    fn test_rejects_malformed_domains() {
        // Scheme prefixes and whitespace
        assert!(Target::from_str("https://example.com").is_err());
        assert!(Target::from_str("exam ple.com").is_err());

        // Dots in the wrong places
        assert!(Target::from_str(".example.com").is_err());
        assert!(Target::from_str("example.com.").is_err());
        assert!(Target::from_str("example..com").is_err());

        // TLD must be >= 2 alphabetic characters
        assert!(Target::from_str("example.c").is_err());
        assert!(Target::from_str("example.c0m").is_err());
        assert!(Target::from_str("example").is_err());

        // Hyphen placement
        assert!(Target::from_str("-example.com").is_err());
        assert!(Target::from_str("example-.com").is_err());

        assert!(Target::from_str("").is_err());
    }

    #[test]
    fn test_owns_matches_suffix() {
        let t = Target::from_str("example.com").unwrap();
        assert!(t.owns("example.com"));
        assert!(t.owns("api.example.com"));
        assert!(t.owns("deep.api.example.com"));
        assert!(!t.owns("example.org"));
        assert!(!t.owns("notexample.com"));
    }

    #[test]
    fn test_hostname_grammar() {
        assert!(is_valid_hostname("api.example.com"));
        assert!(is_valid_hostname("a-1.example.com"));
        assert!(!is_valid_hostname("api_.example.com"));
        assert!(!is_valid_hostname("api..example.com"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname(&format!("{}.example.com", "a".repeat(64))));
    }
}
