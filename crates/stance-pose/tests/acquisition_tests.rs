use stance_pose::{
    AcquisitionError, BodyPart, Keypoint, KeypointModel, MultiPoseConfig, PoseAcquisition,
    PoseError, PoseEstimate, PoseList, Tick,
};
use stance_video::{Frame, FrameSource, Playback, VideoError};
use std::collections::VecDeque;
use std::time::Duration;

// Frame source replaying a script; once exhausted it keeps producing frames
struct ScriptedSource {
    script: VecDeque<Result<Option<Frame>, VideoError>>,
    polls: usize,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Option<Frame>, VideoError>>) -> Self {
        Self {
            script: script.into(),
            polls: 0,
        }
    }

    fn always_ready() -> Self {
        Self::new(Vec::new())
    }
}

impl FrameSource for ScriptedSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        self.polls += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| Ok(Some(Frame::filled(4, 4, [10, 20, 30]))))
    }
}

// Model returning one pose per call unless told otherwise
struct MockModel {
    failures: usize,
    stop_during_inference: Option<Playback>,
    calls: usize,
}

impl MockModel {
    fn new() -> Self {
        Self {
            failures: 0,
            stop_during_inference: None,
            calls: 0,
        }
    }
}

fn one_pose() -> PoseList {
    vec![
        PoseEstimate::new(0.9, vec![Keypoint::new(BodyPart::Nose, 1.0, 1.0, 0.9)]).unwrap(),
    ]
}

impl KeypointModel for MockModel {
    async fn estimate(
        &mut self,
        frame: &Frame,
        config: &MultiPoseConfig,
    ) -> Result<PoseList, PoseError> {
        self.calls += 1;
        assert_eq!(frame.width(), 4);
        assert!(config.multi_pose());

        if let Some(playback) = &self.stop_during_inference {
            playback.stop();
        }
        if self.failures > 0 {
            self.failures -= 1;
            return Err(PoseError::Backend("session crashed".to_string()));
        }
        Ok(one_pose())
    }
}

fn playing() -> Playback {
    let playback = Playback::new();
    playback.start();
    playback
}

#[tokio::test]
async fn test_tick_paused_does_not_poll_source() {
    let (mut acq, feed) = PoseAcquisition::new(
        ScriptedSource::always_ready(),
        MockModel::new(),
        MultiPoseConfig::default(),
        Playback::new(),
    );

    assert_eq!(acq.tick().await.unwrap(), Tick::Paused);
    assert_eq!(feed.latest().sequence, 0);
    assert!(feed.latest().frame.is_none());
    assert!(feed.latest().poses.is_empty());
}

#[tokio::test]
async fn test_tick_publishes_snapshot() {
    let (mut acq, feed) = PoseAcquisition::new(
        ScriptedSource::always_ready(),
        MockModel::new(),
        MultiPoseConfig::default(),
        playing(),
    );

    assert_eq!(acq.tick().await.unwrap(), Tick::Published { poses: 1 });
    let snapshot = feed.latest();
    assert_eq!(snapshot.sequence, 1);
    assert_eq!(snapshot.poses, one_pose());
    assert_eq!(snapshot.frame.as_ref().unwrap().pixel(0, 0), Some([10, 20, 30]));
}

#[tokio::test]
async fn test_tick_without_frame_keeps_previous_snapshot() {
    let source = ScriptedSource::new(vec![Ok(Some(Frame::filled(4, 4, [1, 1, 1]))), Ok(None)]);
    let (mut acq, feed) =
        PoseAcquisition::new(source, MockModel::new(), MultiPoseConfig::default(), playing());

    assert_eq!(acq.tick().await.unwrap(), Tick::Published { poses: 1 });
    assert_eq!(acq.tick().await.unwrap(), Tick::NoFrame);

    let snapshot = feed.latest();
    assert_eq!(snapshot.sequence, 1);
    assert_eq!(snapshot.poses.len(), 1);
}

#[tokio::test]
async fn test_model_error_publishes_empty_list() {
    let mut model = MockModel::new();
    model.failures = 1;
    let (mut acq, feed) = PoseAcquisition::new(
        ScriptedSource::always_ready(),
        model,
        MultiPoseConfig::default(),
        playing(),
    );

    assert_eq!(acq.tick().await.unwrap(), Tick::Published { poses: 0 });
    assert_eq!(feed.latest().sequence, 1);
    assert!(feed.latest().poses.is_empty());

    // No retry: the next tick is a fresh inference that succeeds
    assert_eq!(acq.tick().await.unwrap(), Tick::Published { poses: 1 });
}

#[tokio::test]
async fn test_stop_during_inference_discards_result() {
    let playback = playing();
    let mut model = MockModel::new();
    model.stop_during_inference = Some(playback.clone());
    let (mut acq, feed) = PoseAcquisition::new(
        ScriptedSource::always_ready(),
        model,
        MultiPoseConfig::default(),
        playback.clone(),
    );

    assert_eq!(acq.tick().await.unwrap(), Tick::Discarded);
    assert_eq!(feed.latest().sequence, 0);
    assert!(!playback.is_playing());
    assert_eq!(acq.tick().await.unwrap(), Tick::Paused);
}

#[tokio::test]
async fn test_last_value_wins() {
    let (mut acq, mut feed) = PoseAcquisition::new(
        ScriptedSource::always_ready(),
        MockModel::new(),
        MultiPoseConfig::default(),
        playing(),
    );

    for _ in 0..3 {
        acq.tick().await.unwrap();
    }

    // Readers see only the newest snapshot, not a queue
    assert!(feed.changed().await);
    assert_eq!(feed.latest().sequence, 3);

    let other = acq.subscribe();
    assert_eq!(other.latest().sequence, 3);
}

#[tokio::test]
async fn test_source_error_is_returned() {
    let source = ScriptedSource::new(vec![Err(VideoError::Stream("unplugged".to_string()))]);
    let (mut acq, _feed) =
        PoseAcquisition::new(source, MockModel::new(), MultiPoseConfig::default(), playing());

    match acq.tick().await {
        Err(AcquisitionError::Video(VideoError::Stream(msg))) => assert_eq!(msg, "unplugged"),
        other => panic!("Expected Video error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_until_shutdown() {
    let (acq, feed) = PoseAcquisition::new(
        ScriptedSource::always_ready(),
        MockModel::new(),
        MultiPoseConfig::default(),
        playing(),
    );
    let acq = acq.with_frame_interval(Duration::from_millis(1));

    acq.run_until(tokio::time::sleep(Duration::from_millis(50)))
        .await
        .unwrap();

    assert!(feed.latest().sequence >= 1);
}

#[tokio::test]
async fn test_run_stops_when_feeds_dropped() {
    let (acq, feed) = PoseAcquisition::new(
        ScriptedSource::always_ready(),
        MockModel::new(),
        MultiPoseConfig::default(),
        playing(),
    );
    drop(feed);

    let result = tokio::time::timeout(Duration::from_secs(5), acq.run()).await;
    assert!(result.expect("loop should exit once feeds are gone").is_ok());
}

#[tokio::test]
async fn test_run_propagates_source_error() {
    let source = ScriptedSource::new(vec![
        Ok(None),
        Err(VideoError::Stream("capture thread stopped".to_string())),
    ]);
    let (acq, _feed) =
        PoseAcquisition::new(source, MockModel::new(), MultiPoseConfig::default(), playing());
    let acq = acq.with_frame_interval(Duration::from_millis(1));

    let result = tokio::time::timeout(Duration::from_secs(5), acq.run()).await;
    assert!(matches!(
        result.expect("loop should stop on error"),
        Err(AcquisitionError::Video(_))
    ));
}
