//! Navigation Engine
//!
//! The single entry point tying cache, fetcher, reconciler and history
//! together. One navigation runs at a time; a request made while another is
//! in flight is rejected without side effects.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use fos_dom::Document;
use fos_net::Transport;
use url::Url;

use crate::events::Listeners;
use crate::history::record;
use crate::input::{intercept_path, popstate_path};
use crate::reconcile::{reconcile_tagged, replace_content, update_title};
use crate::{
    ClickDisposition, ClickEvent, Config, Fetcher, HistoryBackend, HistoryState, NavError,
    NavigationEvent, NavigationOutcome, ScriptHost, ScriptReconciler, SessionHistory,
    SubscriptionId, TransitionCache, normalize_path, path_and_query,
};

/// One navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub path: String,
    pub push_state: bool,
    pub replace_state: bool,
}

impl NavigationRequest {
    /// Link-driven navigation that adds a history entry
    pub fn push(path: &str) -> Self {
        Self { path: path.to_string(), push_state: true, replace_state: false }
    }

    /// Navigation that overwrites the current history entry
    pub fn replace(path: &str) -> Self {
        Self { path: path.to_string(), push_state: false, replace_state: true }
    }

    /// Back/forward replay; history already holds the entry
    pub fn replay(path: &str) -> Self {
        Self { path: path.to_string(), push_state: false, replace_state: false }
    }
}

/// Clears the in-flight flag however the navigation ends
struct FlightGuard<'a>(&'a Cell<bool>);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Client-side navigation engine for one page session
pub struct NavigationEngine<T, H, S> {
    config: Config,
    fetcher: Fetcher<T>,
    document: RefCell<Document>,
    cache: RefCell<TransitionCache>,
    scripts: RefCell<ScriptReconciler>,
    history: RefCell<H>,
    host: RefCell<S>,
    location: RefCell<String>,
    navigating: Cell<bool>,
    listeners: RefCell<Listeners>,
}

impl<T: Transport, H: HistoryBackend, S: ScriptHost> NavigationEngine<T, H, S> {
    /// Take over `document` as the live page
    ///
    /// Inline dynamic scripts get ids, the current history entry is replaced
    /// with structured state and a copy of the page is cached under its path.
    pub fn new(config: Config, transport: T, mut history: H, host: S, mut document: Document) -> Self {
        let path = bootstrap_path(document.url());

        let mut scripts = ScriptReconciler::new(&config.dynamic_attr, &config.script_id_attr);
        scripts.assign_ids(&mut document);

        let state = HistoryState::new(&path, &document.title());
        record(&mut history, &state, false, true);

        let mut cache = TransitionCache::new();
        cache.put(&path, document.clone());

        tracing::info!("Navigator ready at {}", path);

        Self {
            fetcher: Fetcher::new(transport, &config),
            config,
            document: RefCell::new(document),
            cache: RefCell::new(cache),
            scripts: RefCell::new(scripts),
            history: RefCell::new(history),
            host: RefCell::new(host),
            location: RefCell::new(path),
            navigating: Cell::new(false),
            listeners: RefCell::new(Listeners::default()),
        }
    }

    /// Navigate according to `request`
    ///
    /// Returns `false` when the navigation failed or was rejected because
    /// another one is in flight. Rejected requests emit no event.
    pub async fn navigate(&self, request: NavigationRequest) -> bool {
        let Some(_flight) = FlightGuard::acquire(&self.navigating) else {
            tracing::debug!("Navigation to {} rejected: already navigating", request.path);
            return false;
        };

        let mut path = normalize_path(&request.path);
        tracing::debug!("Navigating to {}", path);

        let outcome = match self.run(&mut path, &request).await {
            Ok(state) => {
                tracing::info!("Navigated to {}", path);
                NavigationOutcome::Success(state)
            }
            Err(err) => {
                tracing::error!("Navigation error: {} ({})", err, path);
                NavigationOutcome::Failure(err)
            }
        };

        let success = matches!(outcome, NavigationOutcome::Success(_));
        self.emit(&NavigationEvent { path, outcome });
        success
    }

    async fn run(&self, path: &mut String, request: &NavigationRequest) -> Result<HistoryState, NavError> {
        let cached = self.cache.borrow().get(path);
        let incoming = match cached {
            Some(document) => {
                tracing::debug!("Cache hit for {}", path);
                document
            }
            None => {
                let page = self.fetcher.fetch(path).await?;
                *path = page.path;
                let mut document = page.document;
                self.scripts.borrow_mut().assign_ids(&mut document);
                self.cache.borrow_mut().put(path, document.clone());
                document
            }
        };

        let title = {
            let mut live = self.document.borrow_mut();
            let marker = &self.config.dynamic_attr;

            reconcile_tagged(&mut live, &incoming, "link", marker);
            reconcile_tagged(&mut live, &incoming, "style", marker);
            update_title(&mut live, &incoming);

            let scripts = self.scripts.borrow();
            let running = scripts.snapshot(&live);
            replace_content(&mut live, &incoming, &self.config.content_selector)?;
            live.set_url(incoming.url());

            let mut host = self.host.borrow_mut();
            scripts.reconcile_with(&mut live, &incoming, &running, &mut *host);
            host.run_ready();

            live.title()
        };

        let state = HistoryState::new(path, &title);
        let action = record(&mut *self.history.borrow_mut(), &state, request.push_state, request.replace_state);
        tracing::debug!("History {:?} for {}", action, path);

        *self.location.borrow_mut() = path.clone();
        Ok(state)
    }

    fn emit(&self, event: &NavigationEvent) {
        let handlers = self.listeners.borrow().snapshot();
        for handler in handlers {
            handler(event);
        }
    }

    /// Handle a click on the live document
    pub async fn handle_click(&self, event: ClickEvent) -> ClickDisposition {
        let path = {
            let document = self.document.borrow();
            let location = self.location.borrow();
            intercept_path(&document, &self.config.origin, &location, &event)
        };

        match path {
            Some(path) => {
                let accepted = self.navigate(NavigationRequest::push(&path)).await;
                ClickDisposition::Intercepted { path, accepted }
            }
            None => ClickDisposition::Default,
        }
    }

    /// Replay a history entry after back/forward
    ///
    /// `state` is the entry's JSON state; without a `path` in it the current
    /// location is reloaded.
    pub async fn handle_popstate(&self, state: Option<&str>) -> bool {
        let path = popstate_path(state).unwrap_or_else(|| self.location());
        self.navigate(NavigationRequest::replay(&path)).await
    }

    /// Register a navigation listener
    pub fn on_navigate(&self, handler: impl Fn(&NavigationEvent) + 'static) -> SubscriptionId {
        self.listeners.borrow_mut().subscribe(Rc::new(handler))
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().unsubscribe(id)
    }

    /// Run the live page's own dynamic scripts through the host
    ///
    /// Only for hosts that did not execute the initial page themselves.
    /// Returns the number of scripts started.
    pub fn run_page_scripts(&self) -> usize {
        let document = self.document.borrow();
        let mut host = self.host.borrow_mut();
        let started = self.scripts.borrow().run_existing(&document, &mut *host);
        host.run_ready();
        started
    }

    /// Run external scripts that finished loading since the last call
    pub fn pump_scripts(&self) {
        self.host.borrow_mut().run_ready();
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating.get()
    }

    /// Path (plus query) of the page currently shown
    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The live document
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Mutable access to the live document, as page scripts would have
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    pub fn history(&self) -> Ref<'_, H> {
        self.history.borrow()
    }

    pub fn script_host(&self) -> Ref<'_, S> {
        self.host.borrow()
    }

    pub fn transport(&self) -> &T {
        self.fetcher.transport()
    }

    /// Independent copy of the cached document for `path`
    pub fn cached(&self, path: &str) -> Option<Document> {
        self.cache.borrow().get(&normalize_path(path))
    }

    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

/// Navigation path of the page the engine starts on
///
/// Documents not served over http(s), such as `about:blank`, start at `/`.
fn bootstrap_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => normalize_path(&path_and_query(&url)),
        _ => "/".to_string(),
    }
}

impl<T: Transport, S: ScriptHost> NavigationEngine<T, SessionHistory, S> {
    /// Step back in session history and replay the entry
    ///
    /// Returns `false` when there is nothing to go back to.
    pub async fn back(&self) -> bool {
        self.traverse(-1).await
    }

    /// Step forward in session history and replay the entry
    pub async fn forward(&self) -> bool {
        self.traverse(1).await
    }

    /// Move `delta` entries through session history and replay the entry
    pub async fn go(&self, delta: i32) -> bool {
        self.traverse(delta).await
    }

    async fn traverse(&self, delta: i32) -> bool {
        let Some(entry) = self.history.borrow_mut().go(delta).cloned() else {
            return false;
        };

        // The browser moves location before popstate fires
        let base = self.config.origin.clone();
        if let Ok(url) = base.join(&entry.url) {
            *self.location.borrow_mut() = path_and_query(&url);
        }
        self.handle_popstate(entry.state.as_deref()).await
    }
}
