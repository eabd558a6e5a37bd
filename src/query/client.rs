//! Process-wide keyed cache of list queries with tag invalidation

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiError, RemoteApi};
use crate::models::{CacheTag, EntityDraft, EntityRecord, QueryKey};
use crate::query::QueryState;

pub type FetchResult = Result<Arc<Vec<EntityRecord>>, ApiError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct CacheEntry {
    state: watch::Sender<QueryState>,
    stale: bool,
    in_flight: Option<SharedFetch>,
    /// Bumped per started fetch; results of superseded fetches are dropped
    seq: u64,
}

impl CacheEntry {
    fn new() -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            state,
            stale: true,
            in_flight: None,
            seq: 0,
        }
    }

    fn has_observers(&self) -> bool {
        self.state.receiver_count() > 0
    }

    fn fresh_data(&self) -> Option<Arc<Vec<EntityRecord>>> {
        if self.stale {
            return None;
        }
        let state = self.state.borrow();
        if state.is_success() {
            state.data.clone()
        } else {
            None
        }
    }
}

type Entries = Arc<Mutex<HashMap<QueryKey, CacheEntry>>>;

/// Shared query client. Cloning is cheap; all clones see the same cache.
///
/// Readers observe a key and receive [`QueryState`] snapshots; writers go
/// through [`QueryClient::create`], which invalidates by tag and refetches
/// every observed key carrying that tag.
#[derive(Clone)]
pub struct QueryClient {
    api: Arc<dyn RemoteApi>,
    entries: Entries,
}

fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl QueryClient {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self {
            api,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to a key, starting a fetch unless fresh data or a running
    /// request already exists. Dropping the receiver abandons interest.
    pub fn observe(&self, key: &QueryKey) -> watch::Receiver<QueryState> {
        let mut entries = lock(&self.entries);
        let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
        let receiver = entry.state.subscribe();

        if entry.in_flight.is_none() && entry.fresh_data().is_none() {
            drop(self.start_fetch(key, entry));
        }

        receiver
    }

    /// Current snapshot for a key, if it was ever requested
    pub fn snapshot(&self, key: &QueryKey) -> Option<QueryState> {
        lock(&self.entries)
            .get(key)
            .map(|entry| entry.state.borrow().clone())
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        lock(&self.entries)
            .get(key)
            .map(|entry| entry.stale)
            .unwrap_or(true)
    }

    /// Resolve a key, sharing any request already in flight for it
    pub async fn fetch(&self, key: &QueryKey) -> FetchResult {
        let pending = {
            let mut entries = lock(&self.entries);
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);

            if let Some(in_flight) = &entry.in_flight {
                debug!("Joining in-flight fetch for {:?}", key);
                in_flight.clone()
            } else if let Some(data) = entry.fresh_data() {
                return Ok(data);
            } else {
                self.start_fetch(key, entry)
            }
        };

        pending.await
    }

    /// Force a new request for a key even if cached data is fresh
    pub async fn refetch(&self, key: &QueryKey) -> FetchResult {
        let pending = {
            let mut entries = lock(&self.entries);
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            entry.stale = true;
            match &entry.in_flight {
                Some(in_flight) => in_flight.clone(),
                None => self.start_fetch(key, entry),
            }
        };

        pending.await
    }

    /// Run a create mutation; on success invalidate the draft's tags
    pub async fn create(&self, draft: &EntityDraft) -> Result<(), ApiError> {
        if let Err(e) = self.api.create(draft).await {
            warn!("Create via {} failed: {}", draft.create_path(), e);
            return Err(e);
        }

        self.invalidate_tags(draft.invalidates());
        Ok(())
    }

    /// Mark every entry carrying one of the tags stale and refetch the
    /// observed ones. Older in-flight requests are no longer shared.
    pub fn invalidate_tags(&self, tags: &[CacheTag]) {
        let mut entries = lock(&self.entries);
        let mut refetched = 0;

        for (key, entry) in entries.iter_mut() {
            if !tags.contains(&key.tag()) {
                continue;
            }

            // results of fetches started before the mutation must not land
            entry.seq += 1;
            entry.stale = true;
            entry.in_flight = None;

            if entry.has_observers() {
                drop(self.start_fetch(key, entry));
                refetched += 1;
            }
        }

        info!("Invalidated tags {:?}, refetching {} observed queries", tags, refetched);
    }

    /// Spawn the request for `key`. Must be called with the cache lock held
    /// so the spawned task cannot record its result before `in_flight` is set.
    fn start_fetch(&self, key: &QueryKey, entry: &mut CacheEntry) -> SharedFetch {
        entry.seq += 1;
        let seq = entry.seq;
        entry.state.send_modify(QueryState::begin_fetch);

        let api = Arc::clone(&self.api);
        let entries = Arc::clone(&self.entries);
        let task_key = key.clone();

        debug!("Starting fetch #{} for {:?}", seq, key);

        let handle = tokio::spawn(async move {
            let result = api.fetch_list(&task_key).await.map(Arc::new);

            let mut guard = lock(&entries);
            match guard.get_mut(&task_key) {
                Some(entry) if entry.seq == seq => {
                    entry.in_flight = None;
                    match &result {
                        Ok(data) => {
                            entry.stale = false;
                            let data = Arc::clone(data);
                            entry.state.send_modify(|state| state.resolve(data));
                        }
                        Err(e) => {
                            warn!("Fetch for {:?} failed: {}", task_key, e);
                            let message = e.to_string();
                            entry.state.send_modify(|state| state.fail(message));
                        }
                    }
                }
                _ => debug!("Discarding superseded fetch #{} for {:?}", seq, task_key),
            }

            result
        });

        let shared = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(ApiError::Aborted(e.to_string())),
            }
        }
        .boxed()
        .shared();

        entry.in_flight = Some(shared.clone());
        shared
    }
}
