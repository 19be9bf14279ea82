use crate::{Frame, VideoError};

/// Async source of live video frames.
///
/// `next_frame` returns the most recent frame, or `None` when the source has
/// nothing to offer yet (e.g. the camera is still warming up). Callers treat
/// `None` as "skip this tick", not as an error.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError>;
}
