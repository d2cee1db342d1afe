use super::StructuringError;

/// Text-generation client abstraction (allows mocking).
///
/// Implementations must be reentrant: one handle is shared by every
/// in-flight request.
pub trait LlmClient: Send + Sync {
    fn generate(&self, model: &str, prompt: &str, system: &str)
        -> Result<String, StructuringError>;

    fn list_models(&self) -> Result<Vec<String>, StructuringError>;
}

/// Vision-capable client used for image-to-text.
pub trait VisionClient: Send + Sync {
    /// Send one user message with base64-encoded images through `/api/chat`.
    fn chat_with_images(
        &self,
        model: &str,
        user_prompt: &str,
        images: &[String],
        system: Option<&str>,
    ) -> Result<String, StructuringError>;

    /// Ask the server to drop the model from memory.
    fn unload_model(&self, model: &str) -> Result<(), StructuringError>;
}
