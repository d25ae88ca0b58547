//! Browser instance pool with exclusive leases.
//!
//! The pool eagerly launches a fixed number of headless sessions and hands
//! them out one at a time. Admission is a counting semaphore sized to the
//! pool; the busy-flag scan runs inside a single non-suspending critical
//! section, so a permit always corresponds to a free slot. Leases release
//! on drop, on every exit path.

use std::{
    ops::Deref,
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    chromiumoxide::{Browser, BrowserConfig as CdpBrowserConfig, Page},
    futures::StreamExt,
    tokio::sync::{OwnedSemaphorePermit, Semaphore},
    tracing::{debug, info},
};

use crate::{
    error::BrowserError,
    script,
    types::{BrowserPoolConfig, Viewport},
};

/// Fixed-size pool of exclusively leased values.
///
/// The lease-accounting protocol lives here, generic over the session
/// type, so the concurrency contract is testable without a browser:
/// at most `size()` leases are outstanding at any time, and a released
/// slot becomes reacquirable exactly once.
pub struct SlotPool<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    values: Vec<T>,
    free: Mutex<Vec<bool>>,
    semaphore: Arc<Semaphore>,
}

impl<T> SlotPool<T> {
    /// Build a pool over the given values; all slots start free.
    pub fn new(values: Vec<T>) -> Self {
        let n = values.len();
        Self {
            shared: Arc::new(Shared {
                values,
                free: Mutex::new(vec![true; n]),
                semaphore: Arc::new(Semaphore::new(n)),
            }),
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.shared.values.len()
    }

    /// Number of currently leased slots.
    pub fn busy_count(&self) -> usize {
        lock_flags(&self.shared.free).iter().filter(|f| !**f).count()
    }

    /// Wait for a free slot and lease it exclusively.
    ///
    /// Suspends the calling task until the semaphore admits it; callers
    /// queue in the semaphore's FIFO-ish order with no wait timeout.
    ///
    /// # Panics
    ///
    /// Panics if the semaphore admitted this caller but no slot is free.
    /// That state is unreachable unless the release protocol is broken,
    /// which is a programming error rather than a recoverable condition.
    pub async fn acquire(&self) -> Lease<T> {
        let Ok(permit) = self.shared.semaphore.clone().acquire_owned().await else {
            unreachable!("pool semaphore is never closed");
        };

        // Non-suspending critical section: the permit guarantees a free
        // slot, and nothing can run between the scan and the mark.
        let index = {
            let mut free = lock_flags(&self.shared.free);
            match free.iter().position(|f| *f) {
                Some(i) => {
                    free[i] = false;
                    i
                },
                None => panic!("pool invariant violated: permit granted but every slot is busy"),
            }
        };

        debug!(slot = index, "leased pool slot");
        Lease {
            shared: Arc::clone(&self.shared),
            index,
            _permit: permit,
        }
    }
}

fn lock_flags(flags: &Mutex<Vec<bool>>) -> std::sync::MutexGuard<'_, Vec<bool>> {
    // A poisoned lock only means another lease panicked mid-drop; the
    // flag vector itself is still coherent.
    flags.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Exclusive ownership of one pool slot, released exactly once on drop.
pub struct Lease<T> {
    shared: Arc<Shared<T>>,
    index: usize,
    _permit: OwnedSemaphorePermit,
}

impl<T> Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.shared.values[self.index]
    }
}

impl<T> Drop for Lease<T> {
    fn drop(&mut self) {
        // Mark the slot free before the permit drops (field drop runs
        // after this body), so an admitted waiter always finds it.
        lock_flags(&self.shared.free)[self.index] = true;
        debug!(slot = self.index, "released pool slot");
    }
}

/// One live headless-browser session owned by the pool.
pub struct BrowserSession {
    id: String,
    page: Page,
    /// Keeps the CDP connection alive for the pool's lifetime.
    _browser: Browser,
    _handler: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The session's persistent page. Exclusive use is guaranteed by the
    /// lease protocol.
    pub fn page(&self) -> &Page {
        &self.page
    }
}

/// Pool of headless Chromium sessions.
pub struct BrowserPool {
    sessions: SlotPool<BrowserSession>,
    config: BrowserPoolConfig,
}

impl BrowserPool {
    /// Eagerly launch `config.pool_size` sessions.
    pub async fn launch(config: BrowserPoolConfig) -> Result<Self, BrowserError> {
        let detection = crate::detect::detect_browser(config.chrome_path.as_deref());
        if !detection.found {
            return Err(BrowserError::BrowserNotAvailable(detection.install_hint));
        }

        info!(pool_size = config.pool_size, "launching browser pool");
        let mut sessions = Vec::with_capacity(config.pool_size);
        for i in 0..config.pool_size {
            let session = launch_session(&config).await?;
            info!(slot = i, session_id = %session.id, "browser session ready");
            sessions.push(session);
        }

        Ok(Self {
            sessions: SlotPool::new(sessions),
            config,
        })
    }

    /// Number of sessions in the pool.
    pub fn size(&self) -> usize {
        self.sessions.size()
    }

    /// Number of currently leased sessions.
    pub fn busy_count(&self) -> usize {
        self.sessions.busy_count()
    }

    /// Lease one session exclusively. See [`SlotPool::acquire`].
    pub async fn acquire(&self) -> Lease<BrowserSession> {
        self.sessions.acquire().await
    }

    /// Lease a session, configure its viewport and page zoom, and run
    /// `work` against its page. The lease is released when this returns,
    /// whether `work` succeeded or failed.
    pub async fn run_function<T, E, F, Fut>(
        &self,
        viewport: Viewport,
        zoom: f64,
        work: F,
    ) -> Result<T, E>
    where
        E: From<BrowserError>,
        F: FnOnce(Page) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let lease = self.acquire().await;
        let page = lease.page().clone();

        script::configure_viewport(&page, viewport, self.config.device_scale_factor)
            .await
            .map_err(E::from)?;
        script::set_page_zoom(&page, zoom).await.map_err(E::from)?;

        work(page).await
        // `lease` drops here, on success and on every `?` above.
    }
}

/// Launch one headless browser and open its persistent page.
async fn launch_session(config: &BrowserPoolConfig) -> Result<BrowserSession, BrowserError> {
    let mut builder = CdpBrowserConfig::builder();

    if !config.headless {
        builder = builder.with_head();
    }

    builder = builder
        .viewport(chromiumoxide::handler::viewport::Viewport {
            width: config.viewport.width,
            height: config.viewport.height,
            device_scale_factor: Some(config.device_scale_factor),
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        })
        .request_timeout(Duration::from_millis(config.navigation_timeout_ms));

    if let Some(ref path) = config.chrome_path {
        builder = builder.chrome_executable(path);
    }

    for arg in &config.chrome_args {
        builder = builder.arg(arg);
    }

    builder = builder
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox");

    let cdp_config = builder
        .build()
        .map_err(|e| BrowserError::LaunchFailed(format!("failed to build browser config: {e}")))?;

    let (browser, mut handler) = Browser::launch(cdp_config).await.map_err(|e| {
        let install_hint = crate::detect::install_instructions();
        BrowserError::LaunchFailed(format!("browser launch failed: {e}\n\n{install_hint}"))
    })?;

    let id = generate_session_id();
    let id_clone = id.clone();
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            debug!(session_id = id_clone, ?event, "browser event");
        }
    });

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

    Ok(BrowserSession {
        id,
        page,
        _browser: browser,
        _handler: handler_task,
    })
}

/// Generate a random session ID.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let id: u64 = rng.random();
    format!("session-{:016x}", id)
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn generated_session_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[tokio::test]
    async fn never_grants_more_leases_than_slots() {
        let pool = Arc::new(SlotPool::new(vec![(); 3]));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let _lease = pool.acquire().await;
                    peak.fetch_max(pool.busy_count(), Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(pool.busy_count(), 0);
    }

    #[tokio::test]
    async fn lease_released_on_success_and_failure() {
        let pool = SlotPool::new(vec![1u32, 2]);

        async fn failing(pool: &SlotPool<u32>) -> Result<(), &'static str> {
            let _lease = pool.acquire().await;
            Err("injected failure")
        }

        {
            let lease = pool.acquire().await;
            assert_eq!(pool.busy_count(), 1);
            assert!(*lease == 1 || *lease == 2);
        }
        assert_eq!(pool.busy_count(), 0);

        assert!(failing(&pool).await.is_err());
        assert_eq!(pool.busy_count(), 0);
    }

    #[tokio::test]
    async fn waiters_proceed_after_release() {
        let pool = Arc::new(SlotPool::new(vec![(); 1]));

        let lease = pool.acquire().await;
        let waiter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move {
                let _lease = pool.acquire().await;
            })
        };

        // The single slot is held, so the waiter cannot finish yet.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(lease);
        waiter.await.unwrap();
        assert_eq!(pool.busy_count(), 0);
    }
}
