use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use blockhall_atoms::achievements::model::{validate, Achievement};
use blockhall_atoms::store::AchievementStore;

/// How often an idle session re-reads the store.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Snapshot pushed to other sessions when an editor confirms its changes.
#[derive(Debug, Clone)]
pub struct AchievementsUpdate {
    pub origin: u64,
    pub achievements: Vec<Achievement>,
}

/// Fan-out point for confirmed updates. One hub per process; every session
/// subscribes on connect.
pub struct SyncHub {
    sender: broadcast::Sender<AchievementsUpdate>,
    next_session_id: AtomicU64,
}

impl SyncHub {
    pub fn new() -> Arc<SyncHub> {
        let (sender, _) = broadcast::channel(32);
        Arc::new(SyncHub {
            sender,
            next_session_id: AtomicU64::new(1),
        })
    }

    fn register(&self) -> (u64, broadcast::Receiver<AchievementsUpdate>) {
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        (id, self.sender.subscribe())
    }

    fn publish(&self, update: AchievementsUpdate) {
        // No receivers is fine; the update is still in the store
        let _ = self.sender.send(update);
    }
}

/// One editing/viewing session over the shared achievement store.
///
/// State machine: Idle -> Dirty on any local mutation, Dirty -> Idle on
/// `confirm_changes`. While Dirty, inbound updates are suppressed so unsaved
/// edits are not clobbered. The flag is advisory only: two sessions editing
/// concurrently race with last-confirm-wins semantics and no merge.
pub struct SyncSession {
    id: u64,
    store: Arc<dyn AchievementStore>,
    hub: Arc<SyncHub>,
    updates: broadcast::Receiver<AchievementsUpdate>,
    achievements: Vec<Achievement>,
    pending_changes: bool,
}

impl SyncSession {
    pub async fn connect(
        store: Arc<dyn AchievementStore>,
        hub: Arc<SyncHub>,
    ) -> Result<SyncSession, String> {
        let achievements = store.list().await?;
        let (id, updates) = hub.register();

        Ok(SyncSession {
            id,
            store,
            hub,
            updates,
            achievements,
            pending_changes: false,
        })
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending_changes
    }

    /// Add an achievement. Writes through to the store immediately; the
    /// session goes Dirty until the change is confirmed.
    pub async fn add_achievement(
        &mut self,
        achievement: Achievement,
    ) -> Result<Achievement, String> {
        validate(&achievement.title, &achievement.description)?;

        let stored = self.store.add(achievement).await?;
        self.achievements.push(stored.clone());
        self.pending_changes = true;

        Ok(stored)
    }

    pub async fn update_achievement(
        &mut self,
        achievement: Achievement,
    ) -> Result<Achievement, String> {
        validate(&achievement.title, &achievement.description)?;

        let stored = self.store.update(achievement).await?;
        if let Some(slot) = self.achievements.iter_mut().find(|a| a.id == stored.id) {
            *slot = stored.clone();
        }
        self.pending_changes = true;

        Ok(stored)
    }

    pub async fn delete_achievement(&mut self, id: &str) -> Result<(), String> {
        self.store.remove(id).await?;
        self.achievements.retain(|a| a.id != id);
        self.pending_changes = true;

        Ok(())
    }

    pub async fn set_achievement_image(
        &mut self,
        id: &str,
        img: &str,
    ) -> Result<Achievement, String> {
        let stored = self.store.set_image(id, img).await?;
        if let Some(slot) = self.achievements.iter_mut().find(|a| a.id == stored.id) {
            *slot = stored.clone();
        }
        self.pending_changes = true;

        Ok(stored)
    }

    /// Leave the Dirty state and push the session's view of the list to all
    /// other sessions.
    pub fn confirm_changes(&mut self) {
        self.pending_changes = false;
        self.hub.publish(AchievementsUpdate {
            origin: self.id,
            achievements: self.achievements.clone(),
        });
    }

    /// One synchronization step, normally driven every `POLL_INTERVAL`.
    ///
    /// Dirty sessions drop inbound updates unread. Idle sessions first apply
    /// the newest broadcast from another session, then fall back to
    /// re-reading the store and replacing the cache if it changed. Returns
    /// whether the cached list was replaced.
    pub async fn poll_once(&mut self) -> Result<bool, String> {
        let latest = self.drain_updates();

        if self.pending_changes {
            return Ok(false);
        }

        if let Some(update) = latest {
            let changed = update.achievements != self.achievements;
            self.achievements = update.achievements;
            return Ok(changed);
        }

        let stored = self.store.list().await?;
        if stored != self.achievements {
            self.achievements = stored;
            return Ok(true);
        }

        Ok(false)
    }

    fn drain_updates(&mut self) -> Option<AchievementsUpdate> {
        let mut latest = None;
        loop {
            match self.updates.try_recv() {
                Ok(update) => {
                    if update.origin != self.id {
                        latest = Some(update);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Session {} lagged {} sync updates", self.id, n);
                }
                Err(_) => break,
            }
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_achievements;
    use blockhall_atoms::achievements::model::Rarity;
    use blockhall_atoms::store::LocalStore;

    async fn local_store(dir: &tempfile::TempDir, seed: Vec<Achievement>) -> Arc<LocalStore> {
        Arc::new(LocalStore::open(dir.path().join("achievements.json"), seed).await)
    }

    fn achievement(id: &str, title: &str) -> Achievement {
        Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            rarity: Rarity::Common,
            category: "building".to_string(),
            image: "/placeholder.svg".to_string(),
            requirements: String::new(),
            reward: String::new(),
            unlocked: false,
            created_at: String::new(),
        }
    }

    #[tokio::test]
    async fn confirm_clears_pending_and_reaches_other_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir, vec![]).await;
        let hub = SyncHub::new();

        let mut admin = SyncSession::connect(store.clone(), hub.clone()).await.unwrap();
        let mut viewer = SyncSession::connect(store, hub).await.unwrap();

        admin.add_achievement(achievement("", "New card")).await.unwrap();
        assert!(admin.has_pending_changes());

        admin.confirm_changes();
        assert!(!admin.has_pending_changes());

        // One poll step is enough for the other session to catch up
        assert!(viewer.poll_once().await.unwrap());
        assert_eq!(viewer.achievements().len(), 1);
        assert_eq!(viewer.achievements()[0].title, "New card");
    }

    #[tokio::test]
    async fn polling_picks_up_store_changes_without_a_broadcast() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir, vec![]).await;

        // Separate hubs: no broadcast path between the two sessions
        let mut writer = SyncSession::connect(store.clone(), SyncHub::new()).await.unwrap();
        let mut reader = SyncSession::connect(store, SyncHub::new()).await.unwrap();

        writer.add_achievement(achievement("a1", "Written")).await.unwrap();

        assert!(reader.poll_once().await.unwrap());
        assert_eq!(reader.achievements().len(), 1);
        // Nothing new on the second poll
        assert!(!reader.poll_once().await.unwrap());
    }

    #[tokio::test]
    async fn dirty_sessions_suppress_inbound_updates() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir, vec![]).await;
        let hub = SyncHub::new();

        let mut a = SyncSession::connect(store.clone(), hub.clone()).await.unwrap();
        let mut b = SyncSession::connect(store, hub).await.unwrap();

        a.add_achievement(achievement("from-a", "From A")).await.unwrap();
        b.add_achievement(achievement("from-b", "From B")).await.unwrap();

        a.confirm_changes();

        // B is Dirty: A's confirmed update must not clobber B's view
        assert!(!b.poll_once().await.unwrap());
        assert!(b.achievements().iter().any(|x| x.id == "from-b"));

        // Once B confirms, A (Idle) takes B's view: last confirm wins
        b.confirm_changes();
        assert!(a.poll_once().await.unwrap());
        assert_eq!(
            a.achievements().iter().map(|x| x.id.as_str()).collect::<Vec<_>>(),
            b.achievements().iter().map(|x| x.id.as_str()).collect::<Vec<_>>(),
        );
    }

    #[tokio::test]
    async fn mutations_reject_blank_required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir, vec![]).await;
        let mut session = SyncSession::connect(store, SyncHub::new()).await.unwrap();

        let err = session
            .add_achievement(achievement("a1", ""))
            .await
            .unwrap_err();
        assert!(err.contains("required"));
        assert!(!session.has_pending_changes());
        assert!(session.achievements().is_empty());
    }

    #[tokio::test]
    async fn unlocking_a_card_is_visible_to_a_synced_gallery_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut seeded = seed_achievements();
        seeded.truncate(2);
        assert!(!seeded[1].unlocked);
        let target = seeded[1].id.clone();

        let store = local_store(&dir, seeded).await;
        let hub = SyncHub::new();

        let mut admin = SyncSession::connect(store.clone(), hub.clone()).await.unwrap();
        let mut gallery = SyncSession::connect(store, hub).await.unwrap();

        let mut edited = admin
            .achievements()
            .iter()
            .find(|a| a.id == target)
            .cloned()
            .unwrap();
        edited.unlocked = true;
        admin.update_achievement(edited).await.unwrap();
        admin.confirm_changes();

        assert!(gallery.poll_once().await.unwrap());
        let unlocked = crate::filters::filter_achievements(
            gallery.achievements(),
            &crate::filters::ShowcaseFilter {
                unlocked: Some(true),
                ..Default::default()
            },
        );
        assert!(unlocked.iter().any(|a| a.id == target));
    }
}
