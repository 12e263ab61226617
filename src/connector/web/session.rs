use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{ChatHistoryEntry, Transcript};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const MAX_SWEEP: Duration = Duration::from_secs(60);
const MIN_SWEEP: Duration = Duration::from_secs(1);

/// State for one browser session: its transcript and the token that cancels
/// its in-flight requests.
pub struct Session {
    transcript: Transcript,
    cancel: CancellationToken,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            cancel: CancellationToken::new(),
            last_seen: Instant::now(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn record(&mut self, entry: ChatHistoryEntry) {
        self.transcript.push(entry);
    }

    pub fn clear_history(&mut self) {
        self.transcript.clear();
    }

    /// Token for one request; cancelled when the session ends.
    pub fn request_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    fn end(&self) {
        self.cancel.cancel();
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

/// In-memory registry of live sessions. Nothing is written to disk.
///
/// Sessions not looked up for `idle_timeout` are ended by [`reap_idle`],
/// which [`spawn_reaper`] runs periodically.
///
/// [`reap_idle`]: SessionStore::reap_idle
/// [`spawn_reaper`]: SessionStore::spawn_reaper
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub async fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new()));
        self.sessions.write().await.insert(id.clone(), session);
        info!("Session {} started", id);
        id
    }

    /// Look up a session and mark it as active.
    pub async fn get(&self, id: &str) -> Option<SharedSession> {
        let session = self.sessions.read().await.get(id).cloned()?;
        session.lock().await.touch();
        Some(session)
    }

    /// Remove the session and cancel anything it still has in flight.
    pub async fn end(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(session) => {
                session.lock().await.end();
                info!("Session {} ended", id);
                true
            }
            None => false,
        }
    }

    /// End every session, e.g. on server shutdown.
    pub async fn end_all(&self) {
        let drained: Vec<_> = self.sessions.write().await.drain().collect();
        for (_, session) in drained {
            session.lock().await.end();
        }
    }

    /// End every session idle for at least the idle timeout. Returns how
    /// many were ended.
    pub async fn reap_idle(&self) -> usize {
        let sessions: Vec<(String, SharedSession)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, session)| (id.clone(), Arc::clone(session)))
            .collect();

        let mut expired = Vec::new();
        for (id, session) in sessions {
            if session.lock().await.idle_for() >= self.idle_timeout {
                expired.push(id);
            }
        }

        let mut reaped = 0;
        for id in expired {
            if self.end(&id).await {
                reaped += 1;
            }
        }

        if reaped > 0 {
            debug!("Reaped {} idle sessions", reaped);
        }
        reaped
    }

    /// Sweep idle sessions in the background until `shutdown` is cancelled.
    pub fn spawn_reaper(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let period = store.idle_timeout.clamp(MIN_SWEEP, MAX_SWEEP);

        tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        store.reap_idle().await;
                    }
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
