mod settings;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use settings::Settings;
use stance_base::log_fatal;
use stance_pose::{
    ClassificationResult, ModelSource, MultiPoseConfig, OnnxPoseModel, PoseAcquisition,
    PoseClassifier, Renderer, RgbCanvas,
};
use stance_video::{CameraConfig, Playback, V4l2Camera};
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::{self, MissedTickBehavior};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    stance_base::init_stdout_logger();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => log_fatal!("invalid configuration: {e}"),
    };
    log::info!("model: {}", settings.model_path.display());
    log::info!("camera: {} at {}", settings.device, settings.resolution);
    log::info!("controls: S to start, P to stop, ESC to exit");

    let camera_config = CameraConfig::default()
        .with_device(settings.device.clone())
        .with_resolution(settings.resolution);
    let camera = match V4l2Camera::open(camera_config) {
        Ok(camera) => camera,
        Err(e) => log_fatal!("cannot start camera: {e}"),
    };

    let model = match OnnxPoseModel::load(ModelSource::File(settings.model_path.clone())) {
        Ok(model) => model,
        Err(e) => log_fatal!("cannot load pose model: {e}"),
    };

    let (width, height) = (
        settings.resolution.width as usize,
        settings.resolution.height as usize,
    );
    let mut window = match Window::new("stance - ESC to exit", width, height, WindowOptions::default())
    {
        Ok(window) => window,
        Err(e) => log_fatal!("cannot open window: {e}"),
    };

    let config = MultiPoseConfig::default();
    let renderer = Renderer::from_config(&config);
    let classifier = PoseClassifier::new(settings.heuristic);
    let playback = Playback::new();

    let (acquisition, feed) = PoseAcquisition::new(camera, model, config, playback.clone());
    let acquisition = acquisition.with_frame_interval(FRAME_INTERVAL);

    let local = LocalSet::new();
    local
        .run_until(async move {
            let worker = tokio::task::spawn_local(acquisition.run());

            let mut canvas = RgbCanvas::new(width as u32, height as u32);
            let mut ticker = time::interval(FRAME_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut shown: Option<ClassificationResult> = None;
            let mut drawn_sequence = 0;

            while window.is_open() && !window.is_key_down(Key::Escape) {
                ticker.tick().await;

                if window.is_key_pressed(Key::S, KeyRepeat::No) {
                    playback.start();
                }
                if window.is_key_pressed(Key::P, KeyRepeat::No) {
                    playback.stop();
                }
                if worker.is_finished() {
                    break;
                }

                let snapshot = feed.latest();
                if snapshot.sequence != drawn_sequence {
                    drawn_sequence = snapshot.sequence;

                    if let Some(frame) = &snapshot.frame {
                        renderer.render(&mut canvas, frame, &snapshot.poses);
                    }

                    let result = classifier.classify(&snapshot.poses);
                    if shown.map(|s| s.label) != Some(result.label) {
                        log::info!("pose: {result}");
                        window.set_title(&format!("stance - {result}"));
                    }
                    shown = Some(result);
                }

                if let Err(e) = window.update_with_buffer(&canvas.to_argb(), width, height) {
                    log::error!("window update failed: {e}");
                    break;
                }
            }

            // Dropping the feed ends the acquisition loop, which releases the camera
            drop(feed);
            match worker.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log_fatal!("acquisition stopped: {e}"),
                Err(e) => log_fatal!("acquisition task failed: {e}"),
            }
        })
        .await;

    log::info!("exiting");
}
