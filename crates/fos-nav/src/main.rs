//! fOS Navigator - command line driver
//!
//! Loads a page, then performs client-side navigations through it:
//!
//! ```text
//! fos-nav <origin> [path | :back | :forward]...
//! ```
//!
//! The landing page's dynamic scripts run first, then each step. Every
//! navigation event is printed to stdout as one JSON line.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use fos_nav::{Config, JsScriptHost, NavigationEngine, NavigationRequest, SessionHistory, Transport, Url};
use fos_net::ResourceLoader;
use tracing_subscriber::EnvFilter;

/// How long to wait for external scripts before exiting
const SCRIPT_GRACE: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(origin) = args.next() else {
        bail!("usage: fos-nav <origin> [path | :back | :forward]...");
    };
    let origin = Url::parse(&origin).with_context(|| format!("invalid origin `{}`", origin))?;
    let steps: Vec<String> = args.collect();

    let config = Config::default().with_origin(origin.clone());
    let loader = ResourceLoader::builder()
        .user_agent(&config.user_agent)
        .timeout(config.fetch_timeout)
        .build()?;

    smol::block_on(async {
        // Full page load: no navigation header
        let initial = loader.get(&origin, &[]).await?;
        if !initial.ok() {
            bail!("{} answered HTTP {}", initial.url, initial.status);
        }
        let document = fos_html::parse_with_url(&initial.body, initial.url.as_str());
        let history = SessionHistory::new(initial.url.as_str());
        let host = JsScriptHost::new(loader.clone())?;

        let engine = NavigationEngine::new(config, loader, history, host, document);
        engine.on_navigate(|event| match serde_json::to_string(&event.detail()) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Cannot print event: {}", e),
        });

        // Nothing else runs the landing page's scripts here
        let started = engine.run_page_scripts();
        tracing::debug!("Started {} landing page scripts", started);

        for step in &steps {
            match step.as_str() {
                ":back" => engine.back().await,
                ":forward" => engine.forward().await,
                path => engine.navigate(NavigationRequest::push(path)).await,
            };
            engine.pump_scripts();
        }

        let started = Instant::now();
        while engine.script_host().pending() > 0 && started.elapsed() < SCRIPT_GRACE {
            smol::Timer::after(Duration::from_millis(50)).await;
            engine.pump_scripts();
        }

        tracing::info!(
            "Finished at {} ({} pages cached, {} history entries)",
            engine.location(),
            engine.cache_len(),
            engine.history().length()
        );
        Ok::<(), anyhow::Error>(())
    })
}
