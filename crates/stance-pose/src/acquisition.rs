use crate::{AcquisitionError, KeypointModel, MultiPoseConfig, PoseList};
use stance_video::{Frame, FrameSource, Playback};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

/// Default pause between acquisition ticks (about 30 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// The value published after each inference: the poses and the frame they came from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Number of snapshots published before this one, plus one. 0 for the initial empty snapshot.
    pub sequence: u64,
    pub frame: Option<Arc<Frame>>,
    pub poses: PoseList,
}

/// Outcome of one acquisition tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Playback is stopped; the source was not polled.
    Paused,
    /// The source had no frame yet; the previous snapshot stays published.
    NoFrame,
    /// Playback stopped while inference was running; the result was dropped.
    Discarded,
    /// A new snapshot was published.
    Published { poses: usize },
}

/// Read side of the acquisition loop. Always holds the latest snapshot.
#[derive(Debug, Clone)]
pub struct PoseFeed {
    receiver: watch::Receiver<Arc<Snapshot>>,
}

impl PoseFeed {
    pub fn latest(&self) -> Arc<Snapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for a snapshot newer than the last one seen through this feed.
    ///
    /// Returns `false` once the acquisition loop is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

/// Pulls frames from a source, runs the keypoint model and publishes snapshots.
///
/// Publishing replaces the whole snapshot; readers only ever see the newest one.
/// Ticks run one at a time, so at most one inference is in flight.
pub struct PoseAcquisition<S, M> {
    source: S,
    model: M,
    config: MultiPoseConfig,
    playback: Playback,
    frame_interval: Duration,
    publisher: watch::Sender<Arc<Snapshot>>,
    sequence: u64,
}

impl<S: FrameSource, M: KeypointModel> PoseAcquisition<S, M> {
    pub fn new(
        source: S,
        model: M,
        config: MultiPoseConfig,
        playback: Playback,
    ) -> (Self, PoseFeed) {
        let (publisher, receiver) = watch::channel(Arc::new(Snapshot::default()));
        let acquisition = Self {
            source,
            model,
            config,
            playback,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            publisher,
            sequence: 0,
        };
        (acquisition, PoseFeed { receiver })
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Another feed on the same snapshots.
    pub fn subscribe(&self) -> PoseFeed {
        PoseFeed {
            receiver: self.publisher.subscribe(),
        }
    }

    /// Run one acquisition cycle.
    ///
    /// Model errors are logged and published as an empty pose list; frame source
    /// errors are returned. Neither is retried here.
    pub async fn tick(&mut self) -> Result<Tick, AcquisitionError> {
        if !self.playback.is_playing() {
            return Ok(Tick::Paused);
        }

        let Some(frame) = self.source.next_frame().await? else {
            return Ok(Tick::NoFrame);
        };

        let poses = match self.model.estimate(&frame, &self.config).await {
            Ok(poses) => poses,
            Err(e) => {
                log::warn!("pose inference failed: {e}");
                PoseList::new()
            }
        };

        if !self.playback.is_playing() {
            log::debug!("playback stopped during inference, dropping {} poses", poses.len());
            return Ok(Tick::Discarded);
        }

        self.sequence += 1;
        let count = poses.len();
        self.publisher.send_replace(Arc::new(Snapshot {
            sequence: self.sequence,
            frame: Some(Arc::new(frame)),
            poses,
        }));
        log::trace!("snapshot {} published with {} poses", self.sequence, count);

        Ok(Tick::Published { poses: count })
    }

    /// Tick every frame interval until `shutdown` resolves or every feed is dropped.
    ///
    /// A tick that overruns the interval delays the next one instead of
    /// bunching ticks up, so frames never queue behind a slow model.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), AcquisitionError>
    where
        F: Future<Output = ()>,
    {
        let mut interval = time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        log::debug!("acquisition loop started, interval {:?}", self.frame_interval);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    if self.publisher.is_closed() {
                        log::debug!("all pose feeds dropped");
                        break;
                    }
                    self.tick().await?;
                }
            }
        }
        log::debug!("acquisition loop stopped after {} snapshots", self.sequence);

        Ok(())
    }

    /// Tick until every feed is dropped.
    pub async fn run(self) -> Result<(), AcquisitionError> {
        self.run_until(std::future::pending()).await
    }
}
