//! The single companion page, rendered from `templates/index.html`.

use askama::Template;

use crate::models::{HealthProfile, Interaction};

/// Form name and sidebar label for one profile field.
pub struct ProfileField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// What one task panel shows: a guard warning, a model result, or nothing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Panel {
    pub warning: Option<String>,
    pub result: Option<String>,
}

impl From<Interaction> for Panel {
    fn from(interaction: Interaction) -> Self {
        match interaction {
            Interaction::Warning(text) => Panel {
                warning: Some(text),
                result: None,
            },
            Interaction::Result(text) => Panel {
                warning: None,
                result: Some(text),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct PageView {
    pub profile_fields: Vec<ProfileField>,
    pub profile_json: String,
    pub profile_updated: bool,
    pub requirements: String,
    pub meal_plan: Panel,
    pub food_analysis: Panel,
    pub health_query: String,
    pub health_insight: Panel,
}

impl PageView {
    pub fn new(profile: &HealthProfile) -> Self {
        let names = ["goals", "conditions", "routines", "preferences", "restrictions"];
        let profile_fields = profile
            .fields()
            .into_iter()
            .zip(names)
            .map(|((label, value), name)| ProfileField {
                name,
                label,
                value: value.to_string(),
            })
            .collect();

        Self {
            profile_fields,
            profile_json: serde_json::to_string_pretty(profile).unwrap_or_default(),
            profile_updated: false,
            requirements: String::new(),
            meal_plan: Panel::default(),
            food_analysis: Panel::default(),
            health_query: String::new(),
            health_insight: Panel::default(),
        }
    }
}
