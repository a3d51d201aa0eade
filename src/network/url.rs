//! A borrowed view over an already-encoded absolute URL.
//!
//! Building and encoding URLs is the caller's job; this type only splits one
//! into the pieces a connect-only transport needs.

/// The pieces of `scheme://host[:port][/path][?query]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Url<'a> {
    encoded: &'a str,
    scheme: &'a str,
    host: &'a str,
    port: u16,
    target: &'a str,
}

/// Returned when a URL cannot be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidUrl;

impl<'a> Url<'a> {
    /// Split an encoded absolute URL.
    ///
    /// ```rust
    /// use libhttp::network::Url;
    ///
    /// let url = Url::parse("http://example.com:8080/container/blob?comp=list").unwrap();
    /// assert_eq!(url.host(), "example.com");
    /// assert_eq!(url.port(), 8080);
    /// assert_eq!(url.target(), "/container/blob?comp=list");
    /// ```
    pub fn parse(encoded: &'a str) -> Result<Self, InvalidUrl> {
        let (scheme, rest) = encoded.split_once("://").ok_or(InvalidUrl)?;
        if scheme.is_empty() {
            return Err(InvalidUrl);
        }

        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let authority = &rest[..authority_end];
        let mut target = &rest[authority_end..];
        if let Some(fragment) = target.find('#') {
            target = &target[..fragment];
        }
        if target.is_empty() {
            target = "/";
        }

        // userinfo is never sent on the wire
        let host_port = match authority.rfind('@') {
            Some(at) => &authority[at + 1..],
            None => authority,
        };

        let (host, port) = split_host_port(host_port)?;
        let port = match port {
            Some(port) => port,
            None => default_port(scheme).ok_or(InvalidUrl)?,
        };
        if host.is_empty() {
            return Err(InvalidUrl);
        }

        Ok(Self {
            encoded,
            scheme,
            host,
            port,
            target,
        })
    }

    /// The full URL as given.
    pub fn as_str(&self) -> &'a str {
        self.encoded
    }

    /// Scheme without the `://` separator.
    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// Host name or address literal (IPv6 literals keep their brackets).
    pub fn host(&self) -> &'a str {
        self.host
    }

    /// Explicit port, or the scheme default.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether the port was the scheme default.
    pub fn has_default_port(&self) -> bool {
        default_port(self.scheme) == Some(self.port)
    }

    /// Origin-form request target: path plus query, never empty.
    pub fn target(&self) -> &'a str {
        self.target
    }
}

fn split_host_port(host_port: &str) -> Result<(&str, Option<u16>), InvalidUrl> {
    let port_sep = if host_port.starts_with('[') {
        let close = host_port.find(']').ok_or(InvalidUrl)?;
        match &host_port[close + 1..] {
            "" => None,
            tail if tail.starts_with(':') => Some(close + 1),
            _ => return Err(InvalidUrl),
        }
    } else {
        host_port.rfind(':')
    };

    match port_sep {
        Some(sep) => {
            let port = host_port[sep + 1..].parse::<u16>().map_err(|_| InvalidUrl)?;
            Ok((&host_port[..sep], Some(port)))
        }
        None => Ok((host_port, None)),
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    if scheme.eq_ignore_ascii_case("http") {
        Some(80)
    } else if scheme.eq_ignore_ascii_case("https") {
        Some(443)
    } else {
        None
    }
}
