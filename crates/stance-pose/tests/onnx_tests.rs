#![cfg(feature = "onnx")]

use stance_pose::{ModelSource, OnnxPoseModel, PoseError};

#[test]
fn test_onnx_model_load_fails_for_missing_file() {
    let result = OnnxPoseModel::load(ModelSource::File("nonexistent.onnx".into()));

    match result {
        Err(PoseError::ModelLoad(msg)) => assert!(msg.contains("nonexistent.onnx"), "message: {msg}"),
        Err(other) => panic!("Expected PoseError::ModelLoad, got {:?}", other),
        Ok(model) => panic!("Expected an error, loaded {:?}", model),
    }
}

#[test]
fn test_onnx_model_load_fails_for_garbage_bytes() {
    let result = OnnxPoseModel::load(ModelSource::Memory(b"not an onnx model".to_vec()));

    assert!(matches!(result, Err(PoseError::ModelLoad(_))));
}
