//! Session registry: opaque bearer tokens mapped to the actor that logged in.

use async_trait::async_trait;
use branch_desk_api::ActorIdentity;
use moka::future::Cache;
use std::time::Duration;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Registers `actor` and returns a fresh token
    async fn create(&self, actor: ActorIdentity) -> String;

    async fn resolve(&self, token: &str) -> Option<ActorIdentity>;

    /// `true` when a live session was removed
    async fn revoke(&self, token: &str) -> bool;
}

/// In-process registry with a fixed time-to-live per session.
///
/// Tokens are 32 random bytes, hex encoded. Only their blake3 digest is kept
/// as the key.
pub struct MokaSessionStore {
    sessions: Cache<String, ActorIdentity>,
}

impl MokaSessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Cache::builder().time_to_live(ttl).build(),
        }
    }

    fn digest(token: &str) -> String {
        blake3::hash(token.as_bytes()).to_hex().to_string()
    }

    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        hex::encode(bytes)
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, actor: ActorIdentity) -> String {
        let token = Self::generate_token();
        self.sessions.insert(Self::digest(&token), actor).await;
        token
    }

    async fn resolve(&self, token: &str) -> Option<ActorIdentity> {
        self.sessions.get(&Self::digest(token)).await
    }

    async fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(&Self::digest(token)).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_resolve_revoke() {
        let store = MokaSessionStore::new(Duration::from_secs(60));
        let token = store.create(ActorIdentity::admin(1)).await;
        assert_eq!(token.len(), 64);

        assert_eq!(store.resolve(&token).await, Some(ActorIdentity::admin(1)));
        assert!(store.revoke(&token).await);
        assert!(!store.revoke(&token).await);
        assert_eq!(store.resolve(&token).await, None);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = MokaSessionStore::new(Duration::from_secs(60));
        let a = store.create(ActorIdentity::admin(1)).await;
        let b = store.create(ActorIdentity::admin(1)).await;
        assert_ne!(a, b);
        assert!(store.revoke(&a).await);
        assert!(store.resolve(&b).await.is_some());
    }

    #[tokio::test]
    async fn test_sessions_expire() {
        let store = MokaSessionStore::new(Duration::from_millis(50));
        let token = store.create(ActorIdentity::admin(1)).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(store.resolve(&token).await, None);
    }
}
