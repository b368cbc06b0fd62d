//! Impure shell around the reducer: load, apply, run effects, persist.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;

use super::machine::{apply, Effect, Env};
use super::{ChatError, ChatEvent, ChatState};
use crate::autofill::AutofillCache;
use crate::record::DocumentRecord;
use crate::storage::{chat_key, load_json, save_json, StateStore, StorageError};

/// Per-user conversation service.
///
/// Snapshots are cached write-through; every accepted event is persisted before the
/// response goes out. Events for one user are applied one at a time.
#[derive(Clone)]
pub struct ChatSessionService {
    store: Arc<dyn StateStore>,
    autofill: AutofillCache,
    cache: Cache<String, ChatState>,
    /// Per-user event locks, dropped once a user has been idle for a while.
    locks: moka::sync::Cache<String, Arc<tokio::sync::Mutex<()>>>,
}

const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

impl ChatSessionService {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self::with_lock_idle(store, SESSION_IDLE)
    }

    fn with_lock_idle(store: Arc<dyn StateStore>, lock_idle: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(SESSION_IDLE)
            .max_capacity(1000)
            .build();
        let locks = moka::sync::Cache::builder().time_to_idle(lock_idle).build();

        Self {
            autofill: AutofillCache::new(store.clone()),
            store,
            cache,
            locks,
        }
    }

    pub fn autofill(&self) -> &AutofillCache {
        &self.autofill
    }

    fn user_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .get_with(key.to_string(), || Arc::new(tokio::sync::Mutex::new(())))
    }

    /// Current snapshot, restored from storage or fresh.
    pub async fn snapshot(&self, user_id: Option<&str>) -> ChatState {
        let key = chat_key(user_id);
        if let Some(state) = self.cache.get(&key).await {
            return state;
        }

        let state = match load_json::<ChatState>(self.store.as_ref(), &key).await {
            Ok(Some(state)) => {
                log::debug!("Restored chat snapshot {} at step {}", key, state.current_step);
                state
            }
            Ok(None) => ChatState::default(),
            Err(e) => {
                log::error!("Failed to restore chat snapshot, starting fresh: {}", e);
                ChatState::default()
            }
        };
        self.cache.insert(key, state.clone()).await;
        state
    }

    /// Apply one event and persist the result.
    pub async fn apply(&self, user_id: Option<&str>, event: ChatEvent) -> Result<ChatState, ChatError> {
        let key = chat_key(user_id);
        let lock = self.user_lock(&key);
        let _guard = lock.lock().await;

        let state = self.snapshot(user_id).await;
        let env = Env::new(
            Utc::now(),
            self.autofill.load(user_id).await,
            self.autofill.load_company(user_id).await,
        );

        let name = event.name();
        let transition = match apply(&state, event, &env) {
            Ok(transition) => transition,
            Err(e) => {
                log::debug!("Rejected '{}' for {}: {}", name, key, e);
                return Err(e);
            }
        };

        for effect in transition.effects {
            self.run_effect(user_id, effect).await;
        }

        if transition.state.current_step != state.current_step {
            log::info!(
                "Chat {} moved from {} to {} on '{}'",
                key,
                state.current_step,
                transition.state.current_step,
                name
            );
        }

        if let Err(e) = self.persist(&key, &transition.state).await {
            log::error!("Failed to persist chat snapshot: {}", e);
        }
        self.cache.insert(key, transition.state.clone()).await;
        Ok(transition.state)
    }

    async fn run_effect(&self, user_id: Option<&str>, effect: Effect) {
        let result = match &effect {
            Effect::SaveAutofill(partial) => self.autofill.save(user_id, partial.clone()).await,
            Effect::SaveCompanyData(company) => self.autofill.save_company(user_id, company).await,
        };
        if let Err(e) = result {
            log::error!("Failed to apply {:?}: {}", effect, e);
        }
    }

    async fn persist(&self, key: &str, state: &ChatState) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), key, state).await
    }

    /// Drop the transcript. Autofill and company data are kept.
    pub async fn reset(&self, user_id: Option<&str>) -> Result<(), StorageError> {
        let key = chat_key(user_id);
        let lock = self.user_lock(&key);
        let _guard = lock.lock().await;

        self.cache.invalidate(&key).await;
        self.store.delete(&key).await?;
        log::info!("Chat {} cleared", key);
        Ok(())
    }

    /// Document-data record of the committed answers.
    pub async fn record(&self, user_id: Option<&str>) -> DocumentRecord {
        self.snapshot(user_id).await.record()
    }
}
