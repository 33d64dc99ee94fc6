//! Cluster address parsing

use crate::{Error, Result};
use mongodb::options::ServerAddress;

/// Port used when an address omits one
pub const DEFAULT_PORT: u16 = 27017;

/// One cluster member for initial contact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    /// Hostname or IP literal (IPv6 without brackets)
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl EndpointRef {
    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] for blank input, an empty host, an
    /// unbracketed IPv6 literal or a port outside 1-65535.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(invalid("address is blank"));
        }

        let (host, port) = if let Some(rest) = trimmed.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| invalid("unterminated '[' in IPv6 address"))?;
            let port = match after {
                "" => None,
                p => Some(
                    p.strip_prefix(':')
                        .ok_or_else(|| invalid("expected ':' after ']'"))?,
                ),
            };
            if host.contains('[') {
                return Err(invalid("unexpected '[' in IPv6 address"));
            }
            (host.trim(), port)
        } else {
            match trimmed.split_once(':') {
                Some((_, rest)) if rest.contains(':') => {
                    return Err(invalid("IPv6 addresses must be enclosed in brackets"));
                }
                Some((host, port)) => (host, Some(port)),
                None => (trimmed, None),
            }
        };

        if host.trim().is_empty() {
            return Err(invalid("host is empty"));
        }

        let port = match port {
            Some(p) => match p.parse::<u16>() {
                Ok(0) | Err(_) => return Err(invalid("port must be between 1 and 65535")),
                Ok(p) => p,
            },
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Driver address for this endpoint
    pub fn to_server_address(&self) -> ServerAddress {
        ServerAddress::Tcp {
            host: self.host.clone(),
            port: Some(self.port),
        }
    }
}

impl std::fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Resolve configured addresses into endpoints, one per entry, in order.
///
/// Order only affects the initial contact sequence; the replica set
/// discovers the rest of its topology itself.
pub fn resolve_addresses<S: AsRef<str>>(addresses: &[S]) -> Result<Vec<EndpointRef>> {
    addresses
        .iter()
        .map(|a| EndpointRef::parse(a.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_and_port() {
        let ep = EndpointRef::parse("db1.internal:27018").unwrap();
        assert_eq!(ep.host, "db1.internal");
        assert_eq!(ep.port, 27018);
    }

    #[test]
    fn test_parse_default_port() {
        let ep = EndpointRef::parse("localhost").unwrap();
        assert_eq!(ep.port, DEFAULT_PORT);
        assert_eq!(ep.to_string(), "localhost:27017");
    }

    #[test]
    fn test_parse_ipv6() {
        let ep = EndpointRef::parse("[::1]:27019").unwrap();
        assert_eq!(ep.host, "::1");
        assert_eq!(ep.port, 27019);
        assert_eq!(ep.to_string(), "[::1]:27019");

        let ep = EndpointRef::parse("[fe80::1]").unwrap();
        assert_eq!(ep.port, DEFAULT_PORT);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let ep = EndpointRef::parse("  a:1  ").unwrap();
        assert_eq!(ep, EndpointRef { host: "a".into(), port: 1 });
    }

    #[test]
    fn test_parse_invalid() {
        for bad in [
            "", "   ", ":27017", "a:", "a:0", "a:70000", "a:port", "::1", "[::1", "[::1]x", "[ ]",
            "[[a]",
        ] {
            let err = EndpointRef::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidAddress { .. }),
                "expected InvalidAddress for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_resolve_preserves_order() {
        let endpoints = resolve_addresses(&["c:3", "a:1", "b:2"]).unwrap();
        let hosts: Vec<&str> = endpoints.iter().map(|e| e.host.as_str()).collect();
        assert_eq!(hosts, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_resolve_fails_on_first_bad_entry() {
        let err = resolve_addresses(&["a:27017", "b:bad"]).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { ref address, .. } if address == "b:bad"));
    }

    #[test]
    fn test_to_server_address() {
        let ep = EndpointRef::parse("a:27017").unwrap();
        assert_eq!(
            ep.to_server_address(),
            ServerAddress::Tcp {
                host: "a".to_string(),
                port: Some(27017)
            }
        );
    }
}
