use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::image::ImageAsset;

pub const VIDEO_COUNT: u8 = 1;
pub const VIDEO_RESOLUTION: &str = "720p";
pub const VIDEO_ASPECT_RATIO: &str = "16:9";

/// Gateway reference to a generated video, forwarded verbatim when extending it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoObject(Value);

impl VideoObject {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub(crate) fn uri(&self) -> Option<&str> {
        self.0.get("uri").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

impl From<&ImageAsset> for ImageInput {
    fn from(image: &ImageAsset) -> Self {
        Self {
            bytes_base64_encoded: image.to_base64(),
            mime_type: image.mime_type().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInstance {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    pub sample_count: u8,
    pub resolution: String,
    pub aspect_ratio: String,
}

impl Default for VideoParameters {
    fn default() -> Self {
        Self {
            sample_count: VIDEO_COUNT,
            resolution: VIDEO_RESOLUTION.to_string(),
            aspect_ratio: VIDEO_ASPECT_RATIO.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateVideosRequest {
    pub instances: Vec<VideoInstance>,
    pub parameters: VideoParameters,
}

impl GenerateVideosRequest {
    pub fn initial(prompt: impl Into<String>, image: Option<&ImageAsset>) -> Self {
        Self {
            instances: vec![VideoInstance {
                prompt: prompt.into(),
                image: image.map(ImageInput::from),
                video: None,
            }],
            parameters: VideoParameters::default(),
        }
    }

    pub fn extension(prompt: impl Into<String>, previous: VideoObject) -> Self {
        Self {
            instances: vec![VideoInstance {
                prompt: prompt.into(),
                image: None,
                video: Some(previous),
            }],
            parameters: VideoParameters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVideo {
    #[serde(default)]
    pub video: Option<VideoObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedVideo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Succeeded,
    Failed,
}

/// Snapshot of a long-running video job as last reported by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoOperation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<OperationResponse>,
}

impl VideoOperation {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            error: None,
            response: None,
        }
    }

    pub fn succeeded(name: impl Into<String>, videos: Vec<VideoObject>) -> Self {
        Self {
            name: name.into(),
            done: true,
            error: None,
            response: Some(OperationResponse {
                generate_video_response: Some(GenerateVideoResponse {
                    generated_samples: videos
                        .into_iter()
                        .map(|video| GeneratedVideo { video: Some(video) })
                        .collect(),
                }),
            }),
        }
    }

    pub fn failed(name: impl Into<String>, error: Value) -> Self {
        Self {
            name: name.into(),
            done: true,
            error: Some(error),
            response: None,
        }
    }

    pub fn state(&self) -> OperationState {
        match (self.done, &self.error) {
            (false, _) => OperationState::Pending,
            (true, Some(_)) => OperationState::Failed,
            (true, None) => OperationState::Succeeded,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state() != OperationState::Pending
    }

    pub fn first_video(&self) -> Option<&VideoObject> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoResult {
    pub uri: String,
    pub video_object: VideoObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_states() {
        assert_eq!(VideoOperation::pending("op").state(), OperationState::Pending);
        assert!(!VideoOperation::pending("op").is_terminal());

        let failed = VideoOperation::failed("op", json!({ "code": "RESOURCE_EXHAUSTED" }));
        assert_eq!(failed.state(), OperationState::Failed);

        let done = VideoOperation::succeeded("op", vec![]);
        assert_eq!(done.state(), OperationState::Succeeded);
        assert!(done.first_video().is_none());
    }

    #[test]
    fn test_operation_from_gateway_json() {
        let op: VideoOperation = serde_json::from_value(json!({
            "name": "models/veo-3.1-generate-preview/operations/abc123",
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                "generateVideoResponse": {
                    "generatedSamples": [
                        { "video": { "uri": "https://example.test/files/v1:download?alt=media" } }
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(op.state(), OperationState::Succeeded);
        let video = op.first_video().unwrap();
        assert_eq!(video.uri(), Some("https://example.test/files/v1:download?alt=media"));
    }

    #[test]
    fn test_pending_operation_without_done_field() {
        let op: VideoOperation =
            serde_json::from_value(json!({ "name": "operations/xyz" })).unwrap();
        assert_eq!(op.state(), OperationState::Pending);
    }

    #[test]
    fn test_request_parameters_are_fixed() {
        let image = ImageAsset::new(vec![0xff, 0xd8], "image/jpeg").unwrap();
        let value = serde_json::to_value(GenerateVideosRequest::initial("a singer", Some(&image))).unwrap();

        assert_eq!(
            value["parameters"],
            json!({ "sampleCount": 1, "resolution": "720p", "aspectRatio": "16:9" })
        );
        assert_eq!(value["instances"][0]["image"]["mimeType"], "image/jpeg");
        assert_eq!(value["instances"][0]["image"]["bytesBase64Encoded"], "/9g=");
        assert!(value["instances"][0].get("video").is_none());
    }

    #[test]
    fn test_extension_forwards_video_object_verbatim() {
        let previous = VideoObject::from_value(json!({ "uri": "https://v/1", "mimeType": "video/mp4" }));
        let value = serde_json::to_value(GenerateVideosRequest::extension("next verse", previous)).unwrap();

        assert_eq!(
            value["instances"][0]["video"],
            json!({ "uri": "https://v/1", "mimeType": "video/mp4" })
        );
        assert!(value["instances"][0].get("image").is_none());
    }
}
