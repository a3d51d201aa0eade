//! # libhttp - HTTP/1.1 over connect-only sockets
//!
//! A client-side HTTP/1.1 transport engine that drives a raw, non-blocking,
//! connect-only socket. It writes the request head, uploads the body (with
//! `Expect: 100-continue` for PUT), parses the response head incrementally and
//! exposes the body as a pull stream. Everything runs on fixed-size buffers, so
//! the crate supports `no_std` environments.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libhttp = "0.1.0"
//! ```
//!
//! ### Fetching a resource
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # fn main() -> Result<(), libhttp::network::application::http::Error> {
//! use libhttp::network::application::http::{Client, Context, Method, Request};
//! use libhttp::network::tcp::TcpConnector;
//!
//! let mut client: Client<TcpConnector> = Client::new(TcpConnector::new());
//! let mut request = Request::new(Method::Get, "http://example.com/")?;
//! let ctx = Context::background();
//!
//! let mut response = client.send(&ctx, &mut request)?;
//! let mut body = [0u8; 512];
//! while response.read(&ctx, &mut body)? > 0 {}
//! response.close()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```
//!
//! ## Bringing your own socket
//!
//! Implement [`network::Read`], [`network::Write`], [`network::Close`] and
//! [`network::Poll`] for your socket type, mark it as a
//! [`network::Connection`], and hand a [`network::Connect`] implementation to
//! the client. Operations that cannot make progress must return an error whose
//! kind is [`network::error::ErrorKind::WouldBlock`].
//!
//! ## Optional Features
//!
//! - `std`: `std::net` connector with readiness waits backed by `polling`
//! - `defmt`: defmt logging for embedded debugging
//! - `log`: logging through the `log` facade

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

mod fmt;

/// Socket traits and the protocol engines built on them.
pub mod network;
