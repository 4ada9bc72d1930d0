pub mod ai_service; // ModelClient trait + fail-soft generate()
pub mod gemini; // Google Gemini generateContent client
pub mod image;
pub mod prompts;
pub mod sessions;

pub use gemini::GeminiService;
pub use sessions::{SessionRegistry, SessionSigner};
