//! In-process token → identity cache.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use nicelab_entity::{TokenOwner, User};

/// Concurrent map from opaque token to the identity it authenticates.
///
/// Entries are never expired by time; the cache trusts an identity until
/// the process restarts or the owner's token is reissued.
///
/// A store lookup that started before an eviction must not repopulate the
/// cache after it. Fills therefore go through
/// [`TokenCache::insert_if_current`] with the [`TokenCache::epoch`] read
/// before the lookup; any eviction in between rejects the fill.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: DashMap<String, User>,
    epoch: AtomicU64,
    /// Per-user eviction counts. The entry lock also serializes a fill
    /// against an eviction of the same user.
    evictions: DashMap<i64, u64>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a token.
    pub fn get(&self, token: &str) -> Option<User> {
        self.entries.get(token).map(|entry| entry.value().clone())
    }

    #[cfg(test)]
    pub fn insert(&self, token: String, user: User) {
        self.entries.insert(token, user);
    }

    /// Number of evictions so far, across all users.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// How many times `user_id` has been evicted.
    pub fn evictions_of(&self, user_id: i64) -> u64 {
        self.evictions.get(&user_id).map(|count| *count).unwrap_or(0)
    }

    /// Cache `user` for `token` unless any eviction happened since
    /// `observed_epoch` was read. Returns whether the entry was stored.
    pub fn insert_if_current(&self, token: String, user: User, observed_epoch: u64) -> bool {
        // Held across the check and the write; `evict_user` bumps the epoch
        // under the same lock.
        let guard = self.evictions.entry(user.id).or_insert(0);
        if self.epoch.load(Ordering::SeqCst) != observed_epoch {
            return false;
        }
        self.entries.insert(token, user);
        drop(guard);
        true
    }

    /// Bulk-load token owners, returning how many entries were added.
    pub fn extend(&self, owners: impl IntoIterator<Item = TokenOwner>) -> usize {
        let mut loaded = 0;
        for owner in owners {
            self.entries.insert(owner.token, owner.user);
            loaded += 1;
        }
        loaded
    }

    /// Drop every cached token belonging to `user_id`.
    pub fn evict_user(&self, user_id: i64) {
        {
            let mut count = self.evictions.entry(user_id).or_insert(0);
            *count += 1;
            self.epoch.fetch_add(1, Ordering::SeqCst);
        }
        self.entries.retain(|_, user| user.id != user_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
