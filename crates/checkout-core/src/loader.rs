//! # Script Loader
//!
//! Ensures an external script is fetched and executed at most once per
//! page, however many callers ask for it.
//!
//! ```text
//! NotStarted ──► Loading(pending) ──► Ready
//!                     │
//!                     └──────────────► Failed ──► (next call) Loading
//! ```
//!
//! Callers arriving while a load is in flight await the same pending
//! future instead of inserting the script again.

use async_trait::async_trait;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// Inserts a script resource into the host document.
///
/// Resolves `true` once the script's load event fires and `false` on its
/// error event.
#[async_trait(?Send)]
pub trait ScriptInjector {
    async fn inject(&self, url: &str) -> bool;
}

/// In-flight load shared by every caller that arrives while loading
#[derive(Clone)]
pub struct PendingLoad(Shared<LocalBoxFuture<'static, bool>>);

/// Lifecycle of one script URL
#[derive(Clone)]
pub enum LoaderState {
    NotStarted,
    Loading(PendingLoad),
    Ready,
    Failed,
}

impl LoaderState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoaderState::Ready)
    }
}

impl fmt::Debug for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoaderState::NotStarted => "NotStarted",
            LoaderState::Loading(_) => "Loading",
            LoaderState::Ready => "Ready",
            LoaderState::Failed => "Failed",
        };
        f.write_str(name)
    }
}

impl PartialEq for LoaderState {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Injectable loader service. Clones share state, so one loader can be
/// handed to several bridges on the same page.
#[derive(Clone)]
pub struct ScriptLoader {
    injector: Rc<dyn ScriptInjector>,
    scripts: Rc<RefCell<HashMap<String, LoaderState>>>,
}

impl ScriptLoader {
    pub fn new(injector: impl ScriptInjector + 'static) -> Self {
        Self::from_rc(Rc::new(injector))
    }

    pub fn from_rc(injector: Rc<dyn ScriptInjector>) -> Self {
        Self {
            injector,
            scripts: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// True when both loaders track the same scripts
    pub fn shares_state_with(&self, other: &ScriptLoader) -> bool {
        Rc::ptr_eq(&self.scripts, &other.scripts)
    }

    /// Current lifecycle state for `url`
    pub fn state(&self, url: &str) -> LoaderState {
        self.scripts
            .borrow()
            .get(url)
            .cloned()
            .unwrap_or(LoaderState::NotStarted)
    }

    /// Load `url` if it has not been loaded yet.
    ///
    /// Resolves `true` immediately when already ready. A failed load is
    /// retried on the next call.
    #[instrument(skip(self))]
    pub async fn ensure_loaded(&self, url: &str) -> bool {
        let pending = {
            let mut scripts = self.scripts.borrow_mut();
            match scripts.get(url) {
                Some(LoaderState::Ready) => return true,
                Some(LoaderState::Loading(pending)) => {
                    debug!("Script already loading, awaiting in-flight load");
                    pending.clone()
                }
                Some(LoaderState::NotStarted) | Some(LoaderState::Failed) | None => {
                    debug!("Starting script load");
                    let pending = self.start_load(url);
                    scripts.insert(url.to_string(), LoaderState::Loading(pending.clone()));
                    pending
                }
            }
        };

        pending.0.await
    }

    fn start_load(&self, url: &str) -> PendingLoad {
        let injector = Rc::clone(&self.injector);
        let scripts = Rc::downgrade(&self.scripts);
        let url = url.to_string();

        let load = async move {
            let loaded = injector.inject(&url).await;
            if loaded {
                debug!(url = %url, "Script loaded");
            } else {
                warn!(url = %url, "Script failed to load");
            }
            if let Some(scripts) = scripts.upgrade() {
                let next = if loaded {
                    LoaderState::Ready
                } else {
                    LoaderState::Failed
                };
                scripts.borrow_mut().insert(url, next);
            }
            loaded
        };

        PendingLoad(load.boxed_local().shared())
    }
}
