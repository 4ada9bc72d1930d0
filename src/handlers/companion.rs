use std::sync::Arc;

use crate::models::{HealthProfile, Interaction};
use crate::services::ai_service::{generate, ModelClient};
use crate::services::image::{to_payload, UploadedImage};
use crate::services::prompts::{
    build_food_analysis_prompt, build_health_insight_prompt, build_meal_plan_prompt,
};

pub const EMPTY_PROFILE_WARNING: &str =
    "Please fill out your health profile in the sidebar to get personalized recommendations.";
pub const MISSING_IMAGE_WARNING: &str = "Please upload an image of your meal to analyze.";
pub const EMPTY_QUERY_WARNING: &str = "Please enter a health-related question to get insights.";

/// Runs the three companion actions: guard, build the prompt, call the model.
pub struct CompanionHandler {
    model: Arc<dyn ModelClient>,
}

impl CompanionHandler {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    pub async fn meal_plan(&self, profile: &HealthProfile, requirements: Option<&str>) -> Interaction {
        if profile.is_empty() {
            log::warn!("⚠️ Meal plan requested with an empty health profile");
            return Interaction::Warning(EMPTY_PROFILE_WARNING.to_string());
        }

        log::info!("🍽️ Creating personalized meal plan");
        let prompt = build_meal_plan_prompt(profile, requirements);
        let outcome = generate(self.model.as_ref(), &prompt, None).await;

        Interaction::Result(outcome.into_display())
    }

    pub async fn analyze_meal(&self, upload: Option<UploadedImage>) -> Interaction {
        let Some(payload) = to_payload(upload) else {
            log::warn!("⚠️ Meal analysis requested without an image");
            return Interaction::Warning(MISSING_IMAGE_WARNING.to_string());
        };

        log::info!("📸 Analyzing meal image ({}, {} bytes)", payload.mime_type, payload.bytes.len());
        let prompt = build_food_analysis_prompt();
        let outcome = generate(self.model.as_ref(), &prompt, Some(payload)).await;

        Interaction::Result(outcome.into_display())
    }

    pub async fn health_insight(&self, profile: &HealthProfile, query: &str) -> Interaction {
        if query.is_empty() {
            log::warn!("⚠️ Health insight requested without a question");
            return Interaction::Warning(EMPTY_QUERY_WARNING.to_string());
        }

        log::info!("🔬 Researching health question");
        let prompt = build_health_insight_prompt(profile, query);
        let outcome = generate(self.model.as_ref(), &prompt, None).await;

        Interaction::Result(outcome.into_display())
    }
}
