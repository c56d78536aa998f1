//! Image generation state.
//!
//! One operation runs at a time: `idle -> loading -> idle-with-result` or
//! `idle-with-error`. A successful generation hands back a URL, so a second
//! task downloads the bytes and decodes them into a texture for display.
//! The same bytes feed the Save action, which is purely local.

use anyhow::{Context, Result};
use eframe::egui;
use tokio::task::JoinHandle;

use crate::backend::{BackendClient, BackendError, GeneratedImage};
use crate::state::{BackendStatus, StateEvent};
use crate::task::{PollResult, poll_task};

/// Image generation state
pub struct GenerationState {
    /// Whether a generation request is in flight
    pub loading: bool,
    /// Error from validation or the last settled request
    pub error: Option<String>,
    /// Resolved URL of the last generated image
    pub image_url: Option<String>,
    /// The backend's elaboration of the submitted prompt
    pub enhanced_prompt: Option<String>,
    /// Decoded texture of the last generated image
    pub texture: Option<egui::TextureHandle>,
    /// Raw encoded bytes backing the texture, kept for the Save action
    image_bytes: Option<Vec<u8>>,
    /// In-flight generation request
    task: Option<JoinHandle<Result<GeneratedImage, BackendError>>>,
    /// In-flight download of the generated image
    fetch_task: Option<JoinHandle<Result<Vec<u8>, BackendError>>>,
}

impl Default for GenerationState {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            image_url: None,
            enhanced_prompt: None,
            texture: None,
            image_bytes: None,
            task: None,
            fetch_task: None,
        }
    }
}

impl GenerationState {
    /// Client-side submission check. A rejected submission never reaches
    /// the network.
    pub fn validate(prompt: &str, status: BackendStatus) -> Result<(), &'static str> {
        if status != BackendStatus::Online {
            return Err("Backend server is not available. Please make sure it's running.");
        }
        if prompt.trim().is_empty() {
            return Err("Please enter a prompt");
        }
        Ok(())
    }

    /// Submit the form. Validation failures land in `error` without a
    /// network call.
    pub fn start(
        &mut self,
        prompt: &str,
        negative_prompt: &str,
        status: BackendStatus,
        client: &BackendClient,
    ) -> Option<StateEvent> {
        if self.loading {
            return None;
        }

        if let Err(msg) = Self::validate(prompt, status) {
            self.error = Some(msg.to_string());
            return None;
        }

        self.loading = true;
        self.error = None;

        let prompt = prompt.to_string();
        let negative_prompt = negative_prompt.to_string();
        let client = client.clone();

        tracing::info!("Generating image for prompt ({} chars)", prompt.len());
        self.task = Some(tokio::spawn(async move {
            client.generate_image(&prompt, &negative_prompt).await
        }));

        Some(StateEvent::StatusMessage("Generating image...".to_string()))
    }

    /// Whether the Save action has bytes to write
    pub fn has_image(&self) -> bool {
        self.image_bytes.is_some()
    }

    /// Save the displayed image under `generated-image-<unix-ms>.png`,
    /// destination picked via the native save dialog
    pub fn save_to_disk(&self) -> Option<StateEvent> {
        let bytes = self.image_bytes.as_ref()?;

        let filename = format!("generated-image-{}.png", chrono::Utc::now().timestamp_millis());
        let path = rfd::FileDialog::new()
            .set_title("Save Generated Image")
            .set_file_name(&filename)
            .save_file()?;

        match std::fs::write(&path, bytes) {
            Ok(()) => Some(StateEvent::StatusMessage(format!(
                "Saved image to {}",
                path.display()
            ))),
            Err(e) => Some(StateEvent::LogError(format!("Failed to save image: {}", e))),
        }
    }

    /// Poll the generation and download tasks
    pub fn poll(&mut self, ctx: &egui::Context, client: &BackendClient) -> Vec<StateEvent> {
        let mut events = Vec::new();

        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Ok(result))) => {
                self.loading = false;

                let url = client.resolve_image_url(&result.image_url);
                self.image_url = Some(url.clone());
                self.enhanced_prompt = Some(result.enhanced_prompt);
                // The previous image stays visible until the new one arrives
                events.push(StateEvent::LogInfo(format!("Image generated: {}", url)));
                events.push(StateEvent::StatusMessage("Fetching generated image...".to_string()));

                let client = client.clone();
                self.fetch_task = Some(tokio::spawn(async move { client.fetch_image(&url).await }));
            }
            PollResult::Complete(Ok(Err(e))) => {
                self.loading = false;
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Image generation failed: {}", msg)));
                events.push(StateEvent::StatusMessage(format!("Error: {}", msg)));
                self.error = Some(msg);
            }
            PollResult::Complete(Err(e)) => {
                self.loading = false;
                let msg = format!("Generation task panicked: {}", e);
                events.push(StateEvent::LogError(msg.clone()));
                self.error = Some(msg);
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }

        match poll_task(&mut self.fetch_task) {
            PollResult::Complete(Ok(Ok(bytes))) => match decode_image(&bytes) {
                Ok(color_image) => {
                    self.texture = Some(ctx.load_texture(
                        "generated-image",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                    self.image_bytes = Some(bytes);
                    events.push(StateEvent::StatusMessage("Image ready".to_string()));
                }
                Err(e) => {
                    let msg = format!("Failed to decode image: {}", e);
                    events.push(StateEvent::LogError(msg.clone()));
                    self.error = Some(msg);
                }
            },
            PollResult::Complete(Ok(Err(e))) => {
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Image download failed: {}", msg)));
                self.error = Some(msg);
            }
            PollResult::Complete(Err(e)) => {
                events.push(StateEvent::LogError(format!("Image fetch task panicked: {}", e)));
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }

        events
    }
}

/// Decode encoded image bytes into an egui color image
fn decode_image(bytes: &[u8]) -> Result<egui::ColorImage> {
    let image = image::load_from_memory(bytes)
        .context("Unsupported or corrupt image data")?
        .into_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prompt_is_rejected_before_the_network() {
        let err = GenerationState::validate("", BackendStatus::Online).unwrap_err();
        assert_eq!(err, "Please enter a prompt");

        let err = GenerationState::validate("   \t ", BackendStatus::Online).unwrap_err();
        assert_eq!(err, "Please enter a prompt");
    }

    #[test]
    fn submission_requires_an_online_backend() {
        let offline = GenerationState::validate("a fox", BackendStatus::Offline).unwrap_err();
        assert_eq!(
            offline,
            "Backend server is not available. Please make sure it's running."
        );

        // An unresolved probe also blocks submission
        let checking = GenerationState::validate("a fox", BackendStatus::Checking).unwrap_err();
        assert_eq!(
            checking,
            "Backend server is not available. Please make sure it's running."
        );
    }

    #[test]
    fn valid_submission_passes() {
        assert!(GenerationState::validate("a red fox in snow", BackendStatus::Online).is_ok());
    }

    #[test]
    fn rejected_submission_sets_error_without_spawning() {
        let client = BackendClient::new("http://localhost:8000").unwrap();
        let mut state = GenerationState::default();

        // No tokio runtime here: a spawn attempt would panic, proving the
        // validation path never dispatches a request
        let event = state.start("", "", BackendStatus::Online, &client);
        assert!(event.is_none());
        assert_eq!(state.error.as_deref(), Some("Please enter a prompt"));
        assert!(!state.loading);
    }

    #[test]
    fn decodes_png_bytes() {
        let mut bytes = Vec::new();
        let png = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        png.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.size, [2, 3]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_image(b"definitely not an image").is_err());
    }
}
