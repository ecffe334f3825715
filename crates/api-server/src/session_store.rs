use dashboard::{ConfigUpdate, InputError, SessionConfig};
use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    config: SessionConfig,
    last_seen: Instant,
}

/// In-memory sessions. Every access refreshes a session; ones left idle
/// longer than `idle_ttl` are dropped by [`SessionStore::cleanup`].
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start a session with the default configuration.
    pub fn create(&self) -> (Uuid, SessionConfig) {
        let id = Uuid::new_v4();
        let config = SessionConfig::default();
        self.sessions.insert(
            id,
            SessionEntry {
                config: config.clone(),
                last_seen: Instant::now(),
            },
        );
        (id, config)
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionConfig> {
        let mut entry = self.sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.config.clone())
    }

    /// Apply `update` to a session. `None` when the session does not exist;
    /// a rejected update leaves the session unchanged.
    pub fn update(&self, id: &Uuid, update: ConfigUpdate) -> Option<Result<SessionConfig, InputError>> {
        let mut entry = self.sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.config.apply(update).map(|_| entry.config.clone()))
    }

    pub fn remove(&self, id: &Uuid) -> Option<SessionConfig> {
        self.sessions.remove(id).map(|(_, entry)| entry.config)
    }

    /// Drop sessions idle for longer than the TTL. Called periodically by a
    /// background task.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now())
    }

    pub fn cleanup_at(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.idle_ttl);
        before.saturating_sub(self.sessions.len())
    }
}
