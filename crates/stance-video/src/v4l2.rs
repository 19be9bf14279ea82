use crate::{CameraConfig, FacingMode, Frame, FrameSource, VideoError};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

/// V4L2 webcam delivering decoded RGB frames.
///
/// A background thread reads MJPEG buffers, decodes them and offers them to a
/// bounded channel. When the consumer falls behind, new frames are dropped
/// instead of queued.
pub struct V4l2Camera {
    config: CameraConfig,
    receiver: Option<mpsc::Receiver<Frame>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("receiver", &self.receiver.is_some())
            .field("thread_handle", &self.thread_handle.is_some())
            .finish()
    }
}

impl FrameSource for V4l2Camera {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| VideoError::Channel("camera already closed".to_string()))?;

        // Drain to the newest frame; older ones are stale
        let mut latest = None;
        loop {
            match receiver.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    return match latest {
                        Some(frame) => Ok(Some(frame)),
                        None => Err(VideoError::Stream("capture thread stopped".to_string())),
                    };
                }
            }
        }
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // Dropping the receiver makes the capture thread exit on its next send
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        log::info!("camera {} closed", self.config.device());
    }
}

impl V4l2Camera {
    /// Open the camera and start streaming.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::Unavailable` if the device cannot be opened, does not
    /// accept MJPEG at the requested resolution, or rejects the frame rate.
    pub fn open(config: CameraConfig) -> Result<Self, VideoError> {
        if config.facing() != FacingMode::User {
            log::debug!(
                "facing mode {:?} requested, using device {}",
                config.facing(),
                config.device()
            );
        }

        let device = Device::with_path(config.device()).map_err(|e| {
            VideoError::Unavailable(format!("cannot open {}: {e}", config.device()))
        })?;

        let format = Format::new(config.width(), config.height(), FourCC::new(b"MJPG"));
        let format = Capture::set_format(&device, &format)
            .map_err(|e| VideoError::Unavailable(format!("cannot set format: {e}")))?;
        if format.fourcc != FourCC::new(b"MJPG") {
            return Err(VideoError::Unavailable(
                "MJPEG format not supported by device".to_string(),
            ));
        }
        if format.width != config.width() || format.height != config.height() {
            log::warn!(
                "requested {}x{}, device delivers {}x{}",
                config.width(),
                config.height(),
                format.width,
                format.height
            );
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)
            .map_err(|e| VideoError::Unavailable(format!("cannot set frame rate: {e}")))?;

        let buffer_count = config.buffer_count();
        let (tx, rx) = mpsc::channel(buffer_count as usize);
        let handle = thread::spawn(move || {
            if let Err(e) = Self::capture_loop(device, tx, buffer_count) {
                log::error!("capture thread error: {e}");
            }
        });

        log::info!(
            "camera {} open at {}x{} @ {} fps",
            config.device(),
            format.width,
            format.height,
            config.fps()
        );

        Ok(Self {
            config,
            receiver: Some(rx),
            thread_handle: Some(handle),
        })
    }

    fn capture_loop(
        device: Device,
        tx: mpsc::Sender<Frame>,
        buffer_count: u32,
    ) -> Result<(), VideoError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count)?;

        loop {
            let (jpeg, _metadata) = CaptureStream::next(&mut stream)?;

            let frame = match decode_mjpeg(jpeg) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("dropping undecodable frame: {e}");
                    continue;
                }
            };

            match tx.try_send(frame) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Closed(_)) => break,
            }
        }

        Ok(())
    }
}

fn decode_mjpeg(jpeg: &[u8]) -> Result<Frame, VideoError> {
    let image =
        crates_image::load_from_memory_with_format(jpeg, crates_image::ImageFormat::Jpeg)?
            .to_rgb8();
    let (width, height) = image.dimensions();
    Frame::new(width, height, image.into_raw())
}
