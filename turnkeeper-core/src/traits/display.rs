//! Frame output trait

use crate::gfx::Framebuffer;

/// Something that can show a complete frame
///
/// Implementations push the whole buffer in one go. A failed push is
/// returned as is; callers decide whether to skip the frame. Retrying a
/// half-sent frame is never done here.
pub trait FrameSink {
    /// Error type for the underlying transport
    type Error;

    /// Send the whole framebuffer to the panel
    fn push(
        &mut self,
        frame: &Framebuffer,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
