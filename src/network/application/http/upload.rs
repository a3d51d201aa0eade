//! Request body upload.

use super::context::Context;
use super::error::Error;
use super::io;
use super::request::BodyStream;
use crate::network::{Poll, Write};

/// Pump `body` through `socket` in pieces of at most `staging.len()` bytes.
///
/// Never sends more than the stream's declared length, since that is what the
/// `content-length` header promised. Returns the number of bytes sent.
pub(crate) fn upload<C: Write + Poll>(
    socket: &mut C,
    ctx: &Context<'_>,
    body: &mut dyn BodyStream,
    staging: &mut [u8],
    timeout_ms: u32,
) -> Result<u64, Error> {
    if staging.is_empty() {
        return Err(Error::InvariantViolation);
    }

    let declared = body.length();
    let mut uploaded: u64 = 0;
    while uploaded < declared {
        ctx.check()?;
        let left = usize::try_from(declared - uploaded).unwrap_or(usize::MAX);
        let window = staging.len().min(left);
        let read = body.read(ctx, &mut staging[..window])?;
        if read == 0 {
            warn!("body stream ended {} bytes short", declared - uploaded);
            break;
        }
        io::send_all(socket, &staging[..read], timeout_ms)?;
        uploaded += read as u64;
    }
    trace!("uploaded {} bytes", uploaded);
    Ok(uploaded)
}
