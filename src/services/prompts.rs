//! Prompt templates for the three companion tasks.
//!
//! User text is interpolated verbatim; nothing is escaped.

use crate::models::HealthProfile;

pub const MEAL_PLAN_INTRO: &str =
    "Create a personalized meal plan based on the following health profile:";

pub const MEAL_PLAN_INSTRUCTIONS: &str = "Provide:
1. A 7-day meal plan with breakfast, lunch, dinner, and snacks.
2. Nutritional breakdown for each meal (approximate calories, protein, carbs, fats, macros).
3. Contextual explanations for why each meal is recommended based on the health profile.
4. Shopping list for the week organized by category.
5. Preparation tips and time-saving strategies for the meals.

Format the output clearly with headings and bullet points for easy readability.";

pub const NO_EXTRA_REQUIREMENTS: &str = "None provided.";

pub const FOOD_ANALYSIS_PROMPT: &str = "You are an expert nutritionist analyzing a meal based on an image.

Provide detailed nutritional information about:
1. Estimated calorie content
2. Macronutrient breakdown (protein, carbs, fats)
3. Potential health benefits
4. Any concerns or red flags based on common dietary guidelines
5. Suggested portion sizes or modifications to make the meal healthier if needed

If the food contains multiple components, try to identify them separately and provide insights for each.";

pub const HEALTH_INSIGHT_INTRO: &str = "You are a certified nutritionist providing personalized health expertise.
Provide detailed, science-backed insights about:";

pub const HEALTH_INSIGHT_INSTRUCTIONS: &str = "Include:
1. Clear explanations of the science.
2. Practical, actionable recommendations.
3. Any relevant research or precautions based on the user's profile.
4. Suggested foods/supplements if appropriate.
5. References to studies or authoritative sources where applicable.

Use simple language but maintain accuracy and depth in your explanations.";

/// "Label: value" lines for every profile field.
fn profile_block(profile: &HealthProfile) -> String {
    profile
        .fields()
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_meal_plan_prompt(profile: &HealthProfile, extra_requirements: Option<&str>) -> String {
    let extra = match extra_requirements {
        Some(text) if !text.is_empty() => text,
        _ => NO_EXTRA_REQUIREMENTS,
    };

    format!(
        "{}\n\n{}\n\nAdditional requirements: {}\n\n{}",
        MEAL_PLAN_INTRO,
        profile_block(profile),
        extra,
        MEAL_PLAN_INSTRUCTIONS
    )
}

pub fn build_food_analysis_prompt() -> String {
    FOOD_ANALYSIS_PROMPT.to_string()
}

/// Callers must reject an empty query before building.
pub fn build_health_insight_prompt(profile: &HealthProfile, query: &str) -> String {
    format!(
        "{}\n{}\n\nConsider the user's health profile:\n{}\n\n{}",
        HEALTH_INSIGHT_INTRO,
        query,
        profile_block(profile),
        HEALTH_INSIGHT_INSTRUCTIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_profile() -> HealthProfile {
        HealthProfile {
            goals: "Run a marathon".to_string(),
            conditions: "Type 2 diabetes".to_string(),
            routines: "Cycling daily".to_string(),
            preferences: "Mediterranean".to_string(),
            restrictions: "Gluten free".to_string(),
        }
    }

    #[test]
    fn test_meal_plan_prompt_embeds_every_field() {
        let profile = custom_profile();
        let prompt = build_meal_plan_prompt(&profile, Some("High protein breakfasts"));

        for (_, value) in profile.fields() {
            assert!(prompt.contains(value), "missing {}", value);
        }
        assert!(prompt.contains("Additional requirements: High protein breakfasts"));
        assert!(prompt.contains("7-day meal plan"));
        assert!(prompt.contains("Shopping list"));
    }

    #[test]
    fn test_meal_plan_prompt_defaults_without_requirements() {
        let profile = HealthProfile::default();
        let prompt = build_meal_plan_prompt(&profile, Some(""));

        assert!(prompt.contains("Lose 10 pounds in 3 months"));
        assert!(prompt.contains("Additional requirements: None provided."));
        assert_eq!(prompt, build_meal_plan_prompt(&profile, None));
    }

    #[test]
    fn test_meal_plan_prompt_keeps_text_verbatim() {
        let mut profile = custom_profile();
        profile.goals = "<b>{goals}</b> & \"more\"".to_string();
        let prompt = build_meal_plan_prompt(&profile, None);
        assert!(prompt.contains("Health Goals: <b>{goals}</b> & \"more\""));
    }

    #[test]
    fn test_food_analysis_prompt_is_static() {
        let prompt = build_food_analysis_prompt();
        assert_eq!(prompt, FOOD_ANALYSIS_PROMPT);
        assert!(prompt.contains("Estimated calorie content"));
        assert!(prompt.contains("multiple components"));
    }

    #[test]
    fn test_health_insight_prompt_embeds_query_and_profile() {
        let profile = custom_profile();
        let query = "How can I improve my energy levels with diet?";
        let prompt = build_health_insight_prompt(&profile, query);

        assert!(prompt.contains(query));
        for (_, value) in profile.fields() {
            assert!(prompt.contains(value), "missing {}", value);
        }
        assert!(prompt.contains("References to studies"));
    }
}
