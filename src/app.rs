//! Wires config, gateway, generator, storage and the engine together and
//! drives the inbound event loop.

use crate::config::Config;
use crate::content::{ContentGenerator, OpenAiGenerator};
use crate::control::{self, AppState};
use crate::engage::{EngineSettings, ReplyEngine};
use crate::observability::{create_observer, Observer};
use crate::social::{DryRunGateway, Post, SocialGateway};
use crate::storage::ActionStore;
use crate::utils::excerpt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const EVENT_QUEUE_DEPTH: usize = 64;
const FLUSH_INTERVAL_SECS: u64 = 60;

fn engine_settings(config: &Config) -> EngineSettings {
    EngineSettings {
        base_like_rate: config.engine.base_like_rate,
        base_retweet_rate: config.engine.base_retweet_rate,
        engage_threshold: config.engine.engage_threshold,
        thread_length: config.engine.thread_length,
        rng_seed: config.engine.rng_seed,
        limiter_max_calls: config.limiter.max_calls,
        limiter_window: config.limiter.window(),
    }
}

async fn open_storage(config: &Config, dry_run: bool) -> Option<ActionStore> {
    if !config.storage.enabled {
        return None;
    }
    if dry_run {
        return match ActionStore::in_memory().await {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!(error = %err, "in-memory storage unavailable, continuing without");
                None
            }
        };
    }

    let path = config.storage.resolve_path()?;
    match ActionStore::open(&path).await {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "storage unavailable, continuing without"
            );
            None
        }
    }
}

/// Run until ctrl-c or the inbound stream closes.
pub async fn run(config: Config, dry_run: bool) -> anyhow::Result<()> {
    let observer: Arc<dyn Observer> = Arc::from(create_observer(&config.observability));

    let api_key = config.generation.resolve_api_key();
    if api_key.is_none() {
        tracing::warn!("no generation API key configured; replies will use fallback content");
    }
    let generator: Arc<dyn ContentGenerator> = Arc::new(OpenAiGenerator::new(
        config.generation.base_url.clone(),
        config.generation.model.clone(),
        api_key.as_deref(),
    ));

    // The streaming transport is integrator territory; the stock binary
    // always runs against the dry-run gateway.
    let gateway: Arc<dyn SocialGateway> = Arc::new(DryRunGateway::new());
    let gateway_name = gateway.name().to_string();

    let post_enabled = config.engine.post_enabled && !dry_run;
    let account_id = config.engine.account_id;

    let engine = Arc::new(
        ReplyEngine::new(&engine_settings(&config), generator)
            .with_gateway(Arc::clone(&gateway))
            .with_observer(Arc::clone(&observer)),
    );

    let storage = open_storage(&config, dry_run).await.map(Arc::new);

    tracing::info!(
        gateway = %gateway_name,
        post_enabled,
        dry_run,
        tracked_accounts = config.tracking.accounts.len(),
        tracked_keywords = config.tracking.keywords.len(),
        "engine ready"
    );

    let (tx, mut rx) = mpsc::channel::<Post>(EVENT_QUEUE_DEPTH);
    let listen_gateway = Arc::clone(&gateway);
    tokio::spawn(async move {
        if let Err(err) = listen_gateway.listen(tx).await {
            tracing::error!(error = %err, "inbound stream terminated");
        }
    });

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let control_state = AppState {
        engine: Arc::clone(&engine),
        started_at: Instant::now(),
        gateway_name,
        posting_enabled: post_enabled,
    };
    let control_host = config.control.host.clone();
    let control_port = config.control.port;
    let control_task = tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.changed().await;
        };
        if let Err(err) = control::serve(&control_host, control_port, control_state, shutdown).await
        {
            tracing::error!(error = %err, "control surface failed");
        }
    });

    let mut flush_interval = tokio::time::interval(Duration::from_secs(FLUSH_INTERVAL_SECS));
    flush_interval.tick().await; // first tick completes immediately

    loop {
        tokio::select! {
            maybe_post = rx.recv() => match maybe_post {
                Some(post) => {
                    handle_post(&engine, storage.as_deref(), account_id, &post, post_enabled).await;
                }
                None => {
                    tracing::info!("inbound stream closed");
                    break;
                }
            },
            _ = flush_interval.tick() => {
                observer.flush();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = control_task.await;
    observer.flush();
    tracing::info!(
        processed = engine.processed_count(),
        engagements = engine.engagement_history().len(),
        "engine stopped"
    );
    Ok(())
}

async fn handle_post(
    engine: &ReplyEngine,
    storage: Option<&ActionStore>,
    account_id: i64,
    post: &Post,
    post_enabled: bool,
) {
    tracing::info!(
        post_id = %post.id,
        author = %post.author_handle,
        text = %excerpt(&post.text, 100),
        "processing post"
    );

    if let Some(store) = storage
        && let Err(err) = store.record_post(post).await
    {
        tracing::warn!(post_id = %post.id, error = %err, "failed to persist post");
    }

    let records = engine.process_post(post, account_id, None, post_enabled).await;
    tracing::info!(post_id = %post.id, actions = records.len(), "decision pass complete");

    if let Some(store) = storage {
        for record in &records {
            if let Err(err) = store.record_action(record).await {
                tracing::warn!(post_id = %post.id, error = %err, "failed to persist action");
            }
        }
    }
}
