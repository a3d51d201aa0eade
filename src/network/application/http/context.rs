//! Cooperative cancellation.

use super::error::Error;
use core::sync::atomic::{AtomicBool, Ordering};

/// Carries the caller's cancellation flag through an exchange.
///
/// Cancellation is polled, never pushed: the session checks the flag at the top
/// of every body read and before every upload chunk.
///
/// ```rust
/// use core::sync::atomic::{AtomicBool, Ordering};
/// use libhttp::network::application::http::{Context, Error};
///
/// let flag = AtomicBool::new(false);
/// let ctx = Context::with_cancellation(&flag);
/// assert!(ctx.check().is_ok());
///
/// flag.store(true, Ordering::Relaxed);
/// assert_eq!(ctx.check(), Err(Error::Cancelled));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    cancelled: Option<&'a AtomicBool>,
}

impl Context<'static> {
    /// A context that is never cancelled.
    pub const fn background() -> Self {
        Self { cancelled: None }
    }
}

impl<'a> Context<'a> {
    /// A context cancelled once `flag` is set.
    pub const fn with_cancellation(flag: &'a AtomicBool) -> Self {
        Self {
            cancelled: Some(flag),
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// `Err(Error::Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            warn!("exchange cancelled by caller");
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
