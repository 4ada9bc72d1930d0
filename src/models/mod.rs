use serde::{Deserialize, Serialize};

/// The five free-text fields a user fills in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub goals: String,
    pub conditions: String,
    pub routines: String,
    pub preferences: String,
    pub restrictions: String,
}

impl Default for HealthProfile {
    fn default() -> Self {
        Self {
            goals: "Lose 10 pounds in 3 months\n Improve cardiovascular health\n Increase energy levels"
                .to_string(),
            conditions: "None".to_string(),
            routines: "30-minute walk 3 times a week\n Yoga on weekends".to_string(),
            preferences: "Vegetarian\n Low carb".to_string(),
            restrictions: "No dairy\n No nuts".to_string(),
        }
    }
}

impl HealthProfile {
    /// True only when every field is the empty string. Whitespace counts as content.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_empty())
    }

    /// Sidebar label and value for each field, in display order.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("Health Goals", &self.goals),
            ("Medical Conditions", &self.conditions),
            ("Fitness Routines", &self.routines),
            ("Food Preferences", &self.preferences),
            ("Dietary Restrictions", &self.restrictions),
        ]
    }
}

/// Raw image bytes plus the MIME type the upload declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image(ImagePayload),
}

/// One stateless model request: a prompt, optionally followed by one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    parts: Vec<ContentPart>,
}

impl ModelRequest {
    pub fn new(prompt: impl Into<String>, image: Option<ImagePayload>) -> Self {
        let mut parts = vec![ContentPart::Text(prompt.into())];
        if let Some(image) = image {
            parts.push(ContentPart::Image(image));
        }
        Self { parts }
    }

    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, ContentPart::Image(_)))
    }
}

pub const GENERATION_ERROR_PREFIX: &str = "Error generating response: ";

/// Result of a model call. Failures stay values so callers never need an error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    /// The text shown to the user, identical in shape for both variants.
    pub fn into_display(self) -> String {
        match self {
            GenerationOutcome::Success(text) => text,
            GenerationOutcome::Failure(details) => {
                format!("{}{}", GENERATION_ERROR_PREFIX, details)
            }
        }
    }
}

/// What a user action produced: either a guard warning or text to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Warning(String),
    Result(String),
}
