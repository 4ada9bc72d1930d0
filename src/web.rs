use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::services::SessionSigner;

pub mod page;

pub const SESSION_COOKIE: &str = "hc_session";
pub const MEAL_PLAN_FILE_NAME: &str = "personalized_meal_plan.txt";

/// Maximum upload body. Meal photos from phones are a few MiB.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Session id carried by a validly signed `hc_session` cookie, if any.
pub fn existing_session(jar: &CookieJar, signer: &SessionSigner) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| signer.verify(cookie.value()))
}

/// Returns the caller's session id, issuing a fresh signed cookie when the
/// request carried none or a forged one.
pub fn resolve_session(jar: CookieJar, signer: &SessionSigner) -> (CookieJar, String) {
    if let Some(id) = existing_session(&jar, signer) {
        return (jar, id);
    }

    let id = signer.new_session_id();
    let cookie = Cookie::build((SESSION_COOKIE, signer.sign(&id)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    (jar.add(cookie), id)
}

pub mod server {
    use super::page::PageView;
    use super::*;
    use axum::{
        extract::{DefaultBodyLimit, Multipart, State},
        http::{header, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post},
        Form, Json, Router,
    };
    use serde::Deserialize;
    use std::sync::Arc;
    use tower_http::services::ServeDir;

    use crate::handlers::CompanionHandler;
    use crate::models::{HealthProfile, Interaction};
    use crate::services::image::UploadedImage;
    use crate::services::SessionRegistry;

    pub const UNSUPPORTED_IMAGE_WARNING: &str =
        "Unsupported file type. Please upload a JPG, JPEG or PNG image.";

    pub struct AppState {
        pub sessions: Arc<SessionRegistry>,
        pub signer: SessionSigner,
        pub companion: Arc<CompanionHandler>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MealPlanForm {
        #[serde(default)]
        requirements: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct HealthQueryForm {
        #[serde(default)]
        query: String,
    }

    pub fn create_router(state: Arc<AppState>, static_dir: &str) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/profile", post(update_profile_handler))
            .route("/meal-plan", post(meal_plan_handler))
            .route("/meal-plan/download", get(download_meal_plan_handler))
            .route("/food-analysis", post(food_analysis_handler))
            .route("/health-insights", post(health_insights_handler))
            .route("/api/profile", get(profile_json_handler))
            .route("/health", get(health_check))
            .nest_service("/static", ServeDir::new(static_dir))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .with_state(state)
    }

    async fn index_handler(
        State(state): State<Arc<AppState>>,
        jar: CookieJar,
    ) -> (CookieJar, PageView) {
        let (jar, session_id) = resolve_session(jar, &state.signer);
        let profile = state.sessions.profile(&session_id).await;

        (jar, PageView::new(&profile))
    }

    async fn update_profile_handler(
        State(state): State<Arc<AppState>>,
        jar: CookieJar,
        Form(profile): Form<HealthProfile>,
    ) -> (CookieJar, PageView) {
        let (jar, session_id) = resolve_session(jar, &state.signer);

        state.sessions.replace_profile(&session_id, profile).await;

        let mut view = PageView::new(&state.sessions.profile(&session_id).await);
        view.profile_updated = true;

        (jar, view)
    }

    async fn meal_plan_handler(
        State(state): State<Arc<AppState>>,
        jar: CookieJar,
        Form(form): Form<MealPlanForm>,
    ) -> (CookieJar, PageView) {
        let (jar, session_id) = resolve_session(jar, &state.signer);
        let profile = state.sessions.profile(&session_id).await;

        let interaction = state
            .companion
            .meal_plan(&profile, Some(form.requirements.as_str()))
            .await;

        // The download always matches what this panel now shows.
        let shown_plan = match &interaction {
            Interaction::Result(text) => Some(text.clone()),
            Interaction::Warning(_) => None,
        };
        state.sessions.set_last_meal_plan(&session_id, shown_plan).await;

        let mut view = PageView::new(&profile);
        view.requirements = form.requirements;
        view.meal_plan = interaction.into();

        (jar, view)
    }

    async fn download_meal_plan_handler(
        State(state): State<Arc<AppState>>,
        jar: CookieJar,
    ) -> Result<Response, StatusCode> {
        let session_id = existing_session(&jar, &state.signer).ok_or(StatusCode::NOT_FOUND)?;

        let plan = state
            .sessions
            .last_meal_plan(&session_id)
            .await
            .ok_or(StatusCode::NOT_FOUND)?;

        log::info!("💾 Meal plan download for session {}", session_id);

        Ok((
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", MEAL_PLAN_FILE_NAME),
                ),
            ],
            plan,
        )
            .into_response())
    }

    /// Pulls the `image` field out of the upload form. An empty file input counts as no upload.
    async fn read_upload(multipart: &mut Multipart) -> anyhow::Result<Option<UploadedImage>> {
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some("image") {
                continue;
            }

            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?.to_vec();

            if file_name.is_empty() && bytes.is_empty() {
                return Ok(None);
            }

            return Ok(Some(UploadedImage {
                file_name,
                content_type,
                bytes,
            }));
        }

        Ok(None)
    }

    async fn food_analysis_handler(
        State(state): State<Arc<AppState>>,
        jar: CookieJar,
        mut multipart: Multipart,
    ) -> Result<(CookieJar, PageView), StatusCode> {
        let (jar, session_id) = resolve_session(jar, &state.signer);

        let upload = read_upload(&mut multipart).await.map_err(|e| {
            log::error!("Failed to read meal upload: {}", e);
            StatusCode::BAD_REQUEST
        })?;

        let interaction = match upload {
            Some(upload) if !upload.has_accepted_extension() => {
                log::warn!("⚠️ Rejected upload with unsupported name: {}", upload.file_name);
                Interaction::Warning(UNSUPPORTED_IMAGE_WARNING.to_string())
            }
            upload => state.companion.analyze_meal(upload).await,
        };

        let mut view = PageView::new(&state.sessions.profile(&session_id).await);
        view.food_analysis = interaction.into();

        Ok((jar, view))
    }

    async fn health_insights_handler(
        State(state): State<Arc<AppState>>,
        jar: CookieJar,
        Form(form): Form<HealthQueryForm>,
    ) -> (CookieJar, PageView) {
        let (jar, session_id) = resolve_session(jar, &state.signer);
        let profile = state.sessions.profile(&session_id).await;

        let interaction = state.companion.health_insight(&profile, &form.query).await;

        let mut view = PageView::new(&profile);
        view.health_query = form.query;
        view.health_insight = interaction.into();

        (jar, view)
    }

    async fn profile_json_handler(
        State(state): State<Arc<AppState>>,
        jar: CookieJar,
    ) -> (CookieJar, Json<HealthProfile>) {
        let (jar, session_id) = resolve_session(jar, &state.signer);
        let profile = state.sessions.profile(&session_id).await;

        (jar, Json(profile))
    }

    async fn health_check() -> &'static str {
        "OK"
    }
}
