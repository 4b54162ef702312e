//! QuickJS script host
//!
//! Inline scripts run immediately in a shared [`JsContext`]. External
//! scripts download on smol's executor and run on the next
//! [`ScriptHost::run_ready`] call, in completion order.

use fos_js::{JsContext, JsError};
use fos_net::{NetError, ResourceLoader, Response};
use smol::channel::{Receiver, Sender};
use url::Url;

use crate::ScriptHost;

type Loaded = (Url, Result<Response, NetError>);

/// [`ScriptHost`] backed by an embedded QuickJS context
pub struct JsScriptHost {
    context: JsContext,
    loader: ResourceLoader,
    loaded_tx: Sender<Loaded>,
    loaded_rx: Receiver<Loaded>,
    pending: usize,
}

impl JsScriptHost {
    pub fn new(loader: ResourceLoader) -> Result<Self, JsError> {
        let (loaded_tx, loaded_rx) = smol::channel::unbounded();
        Ok(Self {
            context: JsContext::new()?,
            loader,
            loaded_tx,
            loaded_rx,
            pending: 0,
        })
    }

    /// The page's JavaScript context
    pub fn context(&self) -> &JsContext {
        &self.context
    }

    /// External scripts still downloading or waiting to run
    pub fn pending(&self) -> usize {
        self.pending
    }

    fn run(&self, label: &str, source: &str) {
        if let Err(e) = self.context.exec(source) {
            tracing::warn!("Script {} failed: {}", label, e);
        }
    }
}

impl ScriptHost for JsScriptHost {
    fn execute_inline(&mut self, id: &str, source: &str) {
        tracing::debug!("Running inline script {}", id);
        self.run(id, source);
    }

    fn load_external(&mut self, url: &Url) {
        tracing::debug!("Loading script {}", url);
        let request = self.loader.spawn_get(url.clone(), Vec::new());
        let tx = self.loaded_tx.clone();
        let url = url.clone();
        self.pending += 1;

        smol::spawn(async move {
            let result = request.await;
            // Receiver lives as long as the host
            let _ = tx.send((url, result)).await;
        })
        .detach();
    }

    fn run_ready(&mut self) {
        while let Ok((url, result)) = self.loaded_rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match result {
                Ok(response) if response.ok() => self.run(url.as_str(), &response.body),
                Ok(response) => tracing::warn!("Script {} returned HTTP {}", url, response.status),
                Err(e) => tracing::warn!("Script {} failed to load: {}", url, e),
            }
        }
    }
}
