//! Verified-token cache contract plus an in-memory implementation.
//!
//! The cache is consulted before the introspection call and written after a
//! verified outcome, keyed by the opaque access token. Cache failures must
//! never fail a verification; the gate degrades to a fresh introspection.

// self
use crate::{_prelude::*, bearer::AccessToken, gate::VerifiedToken};

/// Boxed future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Cache backend contract for verified-token payloads.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Returns the cached payload for the token, if present and unexpired.
	fn lookup<'a>(&'a self, token: &'a AccessToken) -> CacheFuture<'a, Option<VerifiedToken>>;

	/// Stores a verified payload for the token with the provided TTL.
	fn store<'a>(
		&'a self,
		token: &'a AccessToken,
		verified: VerifiedToken,
		ttl: Duration,
	) -> CacheFuture<'a, ()>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the cache engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[derive(Clone, Debug)]
struct CacheEntry {
	verified: VerifiedToken,
	expires_at: OffsetDateTime,
}

type CacheMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

/// Thread-safe cache that keeps verified payloads in-process for tests and
/// local development.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	fn lookup_now(map: CacheMap, token: &AccessToken, now: OffsetDateTime) -> Option<VerifiedToken> {
		let mut guard = map.write();

		match guard.get(token.expose()) {
			Some(entry) if entry.expires_at > now => Some(entry.verified.clone()),
			Some(_) => {
				guard.remove(token.expose());

				None
			},
			None => None,
		}
	}

	fn store_now(
		map: CacheMap,
		token: &AccessToken,
		verified: VerifiedToken,
		expires_at: OffsetDateTime,
	) {
		map.write().insert(token.expose().to_owned(), CacheEntry { verified, expires_at });
	}
}
impl TokenCache for MemoryCache {
	fn lookup<'a>(&'a self, token: &'a AccessToken) -> CacheFuture<'a, Option<VerifiedToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::lookup_now(map, token, OffsetDateTime::now_utc())) })
	}

	fn store<'a>(
		&'a self,
		token: &'a AccessToken,
		verified: VerifiedToken,
		ttl: Duration,
	) -> CacheFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::store_now(map, token, verified, OffsetDateTime::now_utc() + ttl);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn verified(value: serde_json::Value) -> VerifiedToken {
		VerifiedToken::new(value)
	}

	#[tokio::test]
	async fn lookup_returns_stored_payloads_until_expiry() {
		let cache = MemoryCache::default();
		let token = AccessToken::new("0396f91c7703a2060099");
		let payload = verified(serde_json::json!({ "authorized": true }));

		cache
			.store(&token, payload.clone(), Duration::minutes(5))
			.await
			.expect("Memory cache store should succeed.");

		let hit = cache
			.lookup(&token)
			.await
			.expect("Memory cache lookup should succeed.")
			.expect("Freshly stored payload should be present.");

		assert_eq!(hit, payload);
	}

	#[tokio::test]
	async fn lookup_misses_unknown_tokens() {
		let cache = MemoryCache::default();
		let miss = cache
			.lookup(&AccessToken::new("unknown"))
			.await
			.expect("Memory cache lookup should succeed.");

		assert!(miss.is_none());
	}

	#[test]
	fn expired_entries_are_evicted_on_lookup() {
		let map: CacheMap = Default::default();
		let token = AccessToken::new("stale");
		let now = OffsetDateTime::now_utc();

		MemoryCache::store_now(
			map.clone(),
			&token,
			verified(serde_json::json!({ "authorized": true })),
			now - Duration::seconds(1),
		);

		assert!(MemoryCache::lookup_now(map.clone(), &token, now).is_none());
		assert!(map.read().is_empty(), "Expired entry should be evicted.");
	}
}
