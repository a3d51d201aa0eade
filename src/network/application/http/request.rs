//! Request-side types: methods, headers and body streams.

use super::context::Context;
use super::error::Error;
use super::parser::MAX_LINE_LEN;
use crate::network::Url;
use heapless::{String, Vec};

/// Maximum number of headers a request or response can carry.
pub const MAX_HEADERS: usize = 64;
/// Maximum length of a header name.
pub const MAX_HEADER_NAME_LEN: usize = 64;
/// Maximum length of a header value. Any value that fits on a parsable
/// response line fits here.
pub const MAX_HEADER_VALUE_LEN: usize = MAX_LINE_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Method {
    /// The method token as sent on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }

    /// PUT and POST carry the request body the caller wants stored.
    pub fn is_upload(&self) -> bool {
        matches!(self, Method::Put | Method::Post)
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Method {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String<MAX_HEADER_NAME_LEN>,
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

/// An ordered header multimap with case-insensitive lookup.
///
/// ```rust
/// use libhttp::network::application::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "text/plain").unwrap();
/// assert_eq!(headers.get("content-type"), Some("text/plain"));
/// assert!(headers.contains("CONTENT-TYPE"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<Header, MAX_HEADERS>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping any existing ones with the same name.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let header = Header {
            name: String::try_from(name).map_err(|_| Error::RequestTooLarge)?,
            value: String::try_from(value).map_err(|_| Error::RequestTooLarge)?,
        };
        self.entries.push(header).map_err(|_| Error::RequestTooLarge)
    }

    /// Append an already-validated header.
    pub(crate) fn push(&mut self, header: Header) -> Result<(), Header> {
        self.entries.push(header)
    }

    /// First value stored under `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'h> IntoIterator for &'h Headers {
    type Item = &'h Header;
    type IntoIter = core::slice::Iter<'h, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A readable body of known length.
pub trait BodyStream {
    /// Total number of bytes this stream yields.
    fn length(&self) -> u64;

    /// Copy up to `buf.len()` bytes into `buf`; `Ok(0)` means the stream is drained.
    fn read(&mut self, ctx: &Context<'_>, buf: &mut [u8]) -> Result<usize, Error>;
}

/// A [`BodyStream`] over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct MemoryBodyStream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> MemoryBodyStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not read yet.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }
}

impl BodyStream for MemoryBodyStream<'_> {
    fn length(&self) -> u64 {
        self.data.len() as u64
    }

    fn read(&mut self, ctx: &Context<'_>, buf: &mut [u8]) -> Result<usize, Error> {
        ctx.check()?;
        let count = buf.len().min(self.remaining());
        buf[..count].copy_from_slice(&self.data[self.offset..self.offset + count]);
        self.offset += count;
        Ok(count)
    }
}

/// An outgoing request. The transport reads it and may add `Host`,
/// `content-length` and `Expect` headers before serializing it.
pub struct Request<'a> {
    pub method: Method,
    url: Url<'a>,
    pub headers: Headers,
    body: Option<&'a mut dyn BodyStream>,
    upload_chunk_size: Option<usize>,
}

impl<'a> Request<'a> {
    /// A body-less request for an encoded absolute URL.
    pub fn new(method: Method, url: &'a str) -> Result<Self, Error> {
        Ok(Self {
            method,
            url: Url::parse(url)?,
            headers: Headers::new(),
            body: None,
            upload_chunk_size: None,
        })
    }

    /// Attach the body to upload.
    pub fn with_body(mut self, body: &'a mut dyn BodyStream) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header; chainable counterpart of [`Headers::insert`].
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        self.headers.insert(name, value)?;
        Ok(self)
    }

    /// Override the upload chunk size for this request only.
    pub fn with_upload_chunk_size(mut self, size: usize) -> Self {
        self.upload_chunk_size = Some(size);
        self
    }

    pub fn url(&self) -> &Url<'a> {
        &self.url
    }

    /// The `Host` header value: host, plus the port when it is not the default.
    pub fn host(&self) -> Result<String<MAX_HEADER_VALUE_LEN>, Error> {
        use core::fmt::Write as _;

        let mut host = String::new();
        let written = if self.url.has_default_port() {
            write!(host, "{}", self.url.host())
        } else {
            write!(host, "{}:{}", self.url.host(), self.url.port())
        };
        written.map_err(|_| Error::RequestTooLarge)?;
        Ok(host)
    }

    /// Declared length of the body, `0` when there is none.
    pub fn body_length(&self) -> u64 {
        self.body.as_ref().map_or(0, |body| body.length())
    }

    pub(crate) fn body_mut(&mut self) -> Option<&mut (dyn BodyStream + 'a)> {
        self.body.as_deref_mut()
    }

    pub(crate) fn upload_chunk_size(&self) -> Option<usize> {
        self.upload_chunk_size
    }
}

impl core::fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body_length", &self.body_length())
            .finish()
    }
}
