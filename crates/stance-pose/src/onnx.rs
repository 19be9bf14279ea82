use crate::decode::{decode_poses, letterbox, INPUT_SIZE};
use crate::{KeypointModel, ModelSource, MultiPoseConfig, PoseError, PoseList};
use ndarray::Array4;
use ort::{inputs, session::Session, value::TensorRef};
use stance_video::Frame;

/// YOLO-pose network run through ONNX Runtime on the CPU.
///
/// Expects one `[1, 3, 640, 640]` input and a `[1, 56, N]` output.
pub struct OnnxPoseModel {
    session: Session,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for OnnxPoseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPoseModel")
            .field("session", &"<ort::Session>")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish()
    }
}

impl OnnxPoseModel {
    pub fn load(model: ModelSource) -> Result<Self, PoseError> {
        let builder = Session::builder().map_err(|e| {
            PoseError::ModelLoad(format!("failed to create session builder: {e}"))
        })?;

        let session = match model {
            ModelSource::File(path) => builder.commit_from_file(&path).map_err(|e| {
                PoseError::ModelLoad(format!("failed to load {}: {e}", path.display()))
            })?,
            ModelSource::Memory(bytes) => builder.commit_from_memory(&bytes).map_err(|e| {
                PoseError::ModelLoad(format!("failed to load model from memory: {e}"))
            })?,
        };

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| PoseError::ModelLoad("model has no inputs".to_string()))?;
        let output_name = session
            .outputs()
            .first()
            .map(|output| output.name().to_string())
            .ok_or_else(|| PoseError::ModelLoad("model has no outputs".to_string()))?;

        log::info!("pose model loaded (input '{input_name}', output '{output_name}')");

        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl KeypointModel for OnnxPoseModel {
    async fn estimate(
        &mut self,
        frame: &Frame,
        config: &MultiPoseConfig,
    ) -> Result<PoseList, PoseError> {
        let (input, letterbox) = letterbox(frame);
        let array = Array4::from_shape_vec((1, 3, INPUT_SIZE, INPUT_SIZE), input)
            .map_err(|e| PoseError::Backend(format!("failed to shape input: {e}")))?;
        let tensor = TensorRef::from_array_view(array.view())
            .map_err(|e| PoseError::Backend(format!("failed to create tensor ref: {e}")))?;

        let outputs = self
            .session
            .run(inputs![self.input_name.as_str() => tensor])
            .map_err(|e| PoseError::Backend(format!("inference failed: {e}")))?;

        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| PoseError::Backend(format!("output is not f32: {e}")))?;

        let shape = output.shape().to_vec();
        let data: Vec<f32> = output.iter().copied().collect();
        decode_poses(&data, &shape, &letterbox, config)
    }
}
