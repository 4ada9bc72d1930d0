use anyhow::Result;

use crate::models::{GenerationOutcome, ImagePayload, ModelRequest};

/// Trait for hosted generative models (Gemini, test doubles, etc.)
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate_content(&self, request: &ModelRequest) -> Result<String>;
}

/// Fail-soft wrapper around a single model call: errors come back as `Failure`.
pub async fn generate(
    client: &dyn ModelClient,
    prompt: &str,
    image: Option<ImagePayload>,
) -> GenerationOutcome {
    let request = ModelRequest::new(prompt, image);

    match client.generate_content(&request).await {
        Ok(text) => GenerationOutcome::Success(text),
        Err(e) => {
            log::error!("❌ Model call failed: {:#}", e);
            GenerationOutcome::Failure(format!("{:#}", e))
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every request and answers with a canned reply or error.
    pub struct RecordingClient {
        reply: std::result::Result<String, String>,
        pub requests: Mutex<Vec<ModelRequest>>,
    }

    impl RecordingClient {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<ModelRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait::async_trait]
    impl ModelClient for RecordingClient {
        async fn generate_content(&self, request: &ModelRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(anyhow::anyhow!(message.clone())),
            }
        }
    }
}
