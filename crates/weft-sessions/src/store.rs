use crate::Result;
use crate::session::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Session identifier carried in the session cookie
pub type SessionId = String;

/// Backend that persists sessions between requests
#[async_trait]
pub trait SessionStore: Send + Sync {
	/// Load session data by session ID
	async fn load(&self, session_id: &SessionId) -> Result<Option<Session>>;

	/// Save session data
	async fn save(&self, session_id: &SessionId, session: &Session) -> Result<()>;

	/// Delete session data
	async fn delete(&self, session_id: &SessionId) -> Result<()>;

	/// Create a new session ID
	fn create_session_id(&self) -> SessionId {
		Uuid::new_v4().to_string()
	}
}

/// In-memory session store for tests and single-process deployments
///
/// # Examples
///
/// ```
/// use weft_sessions::{InMemorySessionStore, Session, SessionStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemorySessionStore::new();
/// let id = store.create_session_id();
/// assert!(store.load(&id).await.unwrap().is_none());
///
/// let mut session = Session::new();
/// session.set_as("user", "ada").unwrap();
/// store.save(&id, &session).await.unwrap();
/// assert!(store.load(&id).await.unwrap().is_some());
/// # });
/// ```
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
	sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of live sessions
	pub async fn len(&self) -> usize {
		self.sessions.lock().await.len()
	}
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
	async fn load(&self, session_id: &SessionId) -> Result<Option<Session>> {
		let sessions = self.sessions.lock().await;
		Ok(sessions.get(session_id).cloned().map(|mut session| {
			session.mark_saved();
			session
		}))
	}

	async fn save(&self, session_id: &SessionId, session: &Session) -> Result<()> {
		let mut stored = session.clone();
		stored.mark_saved();
		let mut sessions = self.sessions.lock().await;
		sessions.insert(session_id.clone(), stored);
		tracing::debug!(session_id = %session_id, "session saved");
		Ok(())
	}

	async fn delete(&self, session_id: &SessionId) -> Result<()> {
		let mut sessions = self.sessions.lock().await;
		sessions.remove(session_id);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn store() -> InMemorySessionStore {
		InMemorySessionStore::new()
	}

	#[rstest]
	#[tokio::test]
	async fn test_save_load_delete(store: InMemorySessionStore) {
		let session_id = store.create_session_id();

		let mut session = Session::new();
		session.set("user_id", json!("123"));
		store.save(&session_id, &session).await.unwrap();

		let loaded = store.load(&session_id).await.unwrap().unwrap();
		assert_eq!(loaded.get("user_id"), Some(&json!("123")));
		assert!(!loaded.is_modified());

		store.delete(&session_id).await.unwrap();
		assert!(store.load(&session_id).await.unwrap().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_session_ids_are_unique(store: InMemorySessionStore) {
		let id1 = store.create_session_id();
		let id2 = store.create_session_id();

		assert_ne!(id1, id2);
		assert!(!id1.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_clones_share_storage(store: InMemorySessionStore) {
		let other = store.clone();
		let id = store.create_session_id();

		store.save(&id, &Session::new()).await.unwrap();

		assert_eq!(other.len().await, 1);
	}
}
