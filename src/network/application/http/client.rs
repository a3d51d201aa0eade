use super::buffer::DEFAULT_READER_SIZE;
use super::context::Context;
use super::error::Error;
use super::options::SessionOptions;
use super::request::Request;
use super::response::RawResponse;
use super::session::Session;
use crate::network::Connect;

/// Entry point for sending requests.
///
/// Each [`Client::send`] opens a fresh connection through the connector and
/// runs one exchange on it; connections are never reused.
#[derive(Debug)]
pub struct Client<K: Connect, const N: usize = DEFAULT_READER_SIZE> {
    connector: K,
    options: SessionOptions,
}

impl<K: Connect, const N: usize> Client<K, N> {
    /// A client with default [`SessionOptions`].
    pub fn new(connector: K) -> Self {
        Self::with_options(connector, SessionOptions::default())
    }

    pub fn with_options(connector: K, options: SessionOptions) -> Self {
        Self { connector, options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Send `request` and return once the final response head has arrived.
    ///
    /// The body is not read yet; pull it through [`RawResponse::read`].
    /// Headers the exchange needs (`Host`, `content-length`, `Expect`) are
    /// added to `request` when missing.
    ///
    /// # Errors
    ///
    /// Any failure on the way to the response head. The connection is dropped
    /// and nothing is retried.
    pub fn send(
        &mut self,
        ctx: &Context<'_>,
        request: &mut Request<'_>,
    ) -> Result<RawResponse<K::Connection, N>, Error> {
        debug!("{} {}", request.method, request.url().as_str());
        let mut session = Session::new(self.options);
        let head = session.perform(&mut self.connector, ctx, request)?;
        Ok(RawResponse::new(head, session))
    }
}
