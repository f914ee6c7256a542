use std::net::SocketAddr;

use crate::error::TransportError;

/// A transport endpoint parsed from a `tcp://` or `udp://` URL (§6.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportUrl {
    /// `tcp://HOST:PORT` — connect target or bind address.
    Tcp(SocketAddr),
    /// `udp://BIND_HOST:BIND_PORT-REMOTE_HOST:REMOTE_PORT`.
    Udp {
        bind: SocketAddr,
        remote: SocketAddr,
    },
}

fn parse_addr(text: &str, whole: &str) -> Result<SocketAddr, TransportError> {
    text.parse()
        .map_err(|_| TransportError::InvalidUrl(whole.to_string()))
}

/// Parses `url` against the two schemes this crate's transports support.
/// Grounded on `original_source`'s `checkProtocol`/`start` pair, which
/// dispatches on a `"tcp://"`/`"udp://"` prefix and, for UDP, splits the
/// remainder on `-` into a bind endpoint and a remote endpoint.
pub fn parse(url: &str) -> Result<TransportUrl, TransportError> {
    if let Some(rest) = url.strip_prefix("tcp://") {
        return Ok(TransportUrl::Tcp(parse_addr(rest, url)?));
    }
    if let Some(rest) = url.strip_prefix("udp://") {
        let (bind_part, remote_part) = rest
            .split_once('-')
            .ok_or_else(|| TransportError::InvalidUrl(url.to_string()))?;
        let bind = parse_addr(bind_part, url)?;
        let remote = parse_addr(remote_part, url)?;
        return Ok(TransportUrl::Udp { bind, remote });
    }
    Err(TransportError::InvalidUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tcp_url() {
        let parsed = parse("tcp://127.0.0.1:8080").unwrap();
        assert_eq!(parsed, TransportUrl::Tcp("127.0.0.1:8080".parse().unwrap()));
    }

    #[test]
    fn parses_udp_url_with_bind_and_remote() {
        let parsed = parse("udp://127.0.0.1:12345-127.0.0.1:12346").unwrap();
        assert_eq!(
            parsed,
            TransportUrl::Udp {
                bind: "127.0.0.1:12345".parse().unwrap(),
                remote: "127.0.0.1:12346".parse().unwrap(),
            }
        );
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert!(parse("ftp://127.0.0.1:21").is_err());
    }

    #[test]
    fn rejects_udp_url_missing_remote() {
        assert!(parse("udp://127.0.0.1:12345").is_err());
    }
}
