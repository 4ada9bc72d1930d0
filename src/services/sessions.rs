use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::models::HealthProfile;

type HmacSha256 = Hmac<Sha256>;

/// Holds one session's profile. Updates always replace all five fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profile: HealthProfile,
}

impl ProfileStore {
    pub fn get(&self) -> HealthProfile {
        self.profile.clone()
    }

    pub fn replace(&mut self, profile: HealthProfile) {
        self.profile = profile;
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub profile: ProfileStore,
    pub last_meal_plan: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            profile: ProfileStore::default(),
            last_meal_plan: None,
            last_seen: Utc::now(),
        }
    }
}

/// All live sessions, keyed by session id. Sessions are created on first use.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(id.to_string()).or_insert_with(|| {
            log::info!("👤 New session: {}", id);
            Session::new()
        });
        session.last_seen = Utc::now();
        f(session)
    }

    pub async fn profile(&self, id: &str) -> HealthProfile {
        self.with_session(id, |s| s.profile.get()).await
    }

    pub async fn replace_profile(&self, id: &str, profile: HealthProfile) {
        self.with_session(id, |s| s.profile.replace(profile)).await;
        log::info!("📝 Health profile updated for session {}", id);
    }

    /// Records the meal plan on screen, or clears it when the panel shows none.
    pub async fn set_last_meal_plan(&self, id: &str, plan: Option<String>) {
        self.with_session(id, |s| s.last_meal_plan = plan).await;
    }

    /// Looks up an existing session only; unknown ids never create an entry.
    pub async fn last_meal_plan(&self, id: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id)?;
        session.last_seen = Utc::now();
        session.last_meal_plan.clone()
    }

    /// Drops sessions not seen within `max_idle`. Returns how many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Issues session ids and signs them for the `hc_session` cookie.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(&secret.into())
            .map_err(|e| anyhow::anyhow!("invalid session secret: {}", e))?;

        Ok(Self { mac })
    }

    pub fn new_session_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Cookie value: `<id>.<hex signature>`.
    pub fn sign(&self, id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        format!("{}.{}", id, hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns the session id when the cookie value carries a valid signature.
    pub fn verify(&self, cookie_value: &str) -> Option<String> {
        let (id, signature) = cookie_value.split_once('.')?;
        if id.is_empty() {
            return None;
        }
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(id.to_string())
    }
}
