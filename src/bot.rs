// Bot lifecycle
// Wires config, stores, Moltbook client, coordinator and heartbeat
// together and owns the start/chat/stop surface

use anyhow::{Context, Result};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::assistant::{ReminderStore, TaskStore};
use crate::config::{BotConfig, BotIdentity};
use crate::coordinator::{route, Coordinator, DailyStats, Intent};
use crate::heartbeat::Heartbeat;
use crate::logging::ActivityLogger;
use crate::metrics::{MetricsLogger, RequestMetric};
use crate::moltbook::MoltbookClient;

pub struct Moltbot {
    config: BotConfig,
    coordinator: Arc<Coordinator>,
    heartbeat: Arc<Heartbeat>,
    moltbook: Option<Arc<MoltbookClient>>,
    metrics: MetricsLogger,
    heartbeat_handle: Option<JoinHandle<()>>,
    running: bool,
}

impl Moltbot {
    /// Build the bot from configuration. Loads every store under
    /// `config.data_dir` and connects the Moltbook client only when the
    /// integration is enabled and a key is present.
    pub fn new(config: BotConfig) -> Result<Self> {
        let identity = BotIdentity::from_config(&config);

        let tasks = TaskStore::load(config.data_dir.join("tasks.toml"))
            .context("Failed to load task store")?;
        let reminders = Arc::new(Mutex::new(
            ReminderStore::load(config.data_dir.join("reminders.toml"))
                .context("Failed to load reminder store")?,
        ));
        let stats = Arc::new(DailyStats::load(
            config.data_dir.join("daily_stats.json"),
            Local::now().date_naive(),
        ));
        let activity = ActivityLogger::new(config.data_dir.clone())
            .context("Failed to create activity logger")?;
        let metrics = MetricsLogger::new(config.data_dir.join("metrics"))
            .context("Failed to create metrics logger")?;

        let moltbook = if config.moltbook_enabled() {
            let api_key = config
                .moltbook_api_key
                .clone()
                .context("Moltbook enabled without an API key")?;
            let client = match &config.moltbook_base_url {
                Some(url) => MoltbookClient::with_base_url(api_key, identity.clone(), url.clone()),
                None => MoltbookClient::new(api_key, identity.clone()),
            }
            .context("Failed to create Moltbook client")?;
            Some(Arc::new(client))
        } else {
            None
        };

        let coordinator = Arc::new(Coordinator::new(
            config.clone(),
            tasks,
            reminders.clone(),
            stats.clone(),
            moltbook.clone(),
            activity.clone(),
        ));

        let heartbeat = Arc::new(Heartbeat::new(
            reminders,
            stats,
            moltbook.clone(),
            config.limits.clone(),
            std::time::Duration::from_secs(config.check_interval_minutes * 60),
            activity,
        ));

        Ok(Self {
            config,
            coordinator,
            heartbeat,
            moltbook,
            metrics,
            heartbeat_handle: None,
            running: false,
        })
    }

    /// Print the startup banner, authenticate with Moltbook when enabled,
    /// and spawn the heartbeat. Auth failure is reported but not fatal:
    /// the assistant still works, only social features stay dark.
    pub async fn start(&mut self) -> Result<()> {
        if self.running {
            return Ok(());
        }

        println!("Moltbot v{}", env!("CARGO_PKG_VERSION"));
        println!("  Owner: {}", self.config.owner_name);
        println!("  Timezone: {}", self.config.timezone);
        println!(
            "  Heartbeat: every {} minutes",
            self.config.check_interval_minutes
        );
        println!("  Features: {}", self.config.features.enabled_summary());

        if self.config.features.moltbook && !self.config.moltbook_enabled() {
            warn!("MOLTBOOK_API_KEY is not set; Moltbook features are disabled");
        }

        if let Some(client) = &self.moltbook {
            // Up-front auth so credential problems show at startup,
            // not on the first post an hour later
            match client.authenticate().await {
                Ok(()) => println!("  Moltbook: connected as {}", client.agent_name()),
                Err(e) => {
                    println!("  Moltbook: authentication failed");
                    warn!("Moltbook authentication failed: {:#}", e);
                }
            }
        } else {
            println!("  Moltbook: disabled");
        }

        let heartbeat = self.heartbeat.clone();
        self.heartbeat_handle = Some(tokio::spawn(async move {
            heartbeat.run().await;
        }));

        self.running = true;
        info!("Moltbot started for {}", self.config.owner_name);
        Ok(())
    }

    /// Answer one owner message, recording a request metric
    pub async fn chat(&self, message: &str) -> Result<String> {
        let started = Instant::now();
        let intent = route(message);
        let response = self.coordinator.handle_request(message).await?;

        let metric = RequestMetric::new(
            MetricsLogger::hash_message(message),
            intent.as_str().to_string(),
            started.elapsed().as_millis() as u64,
            intent == Intent::Social && self.coordinator.moltbook_active(),
        );
        if let Err(e) = self.metrics.log(&metric) {
            warn!("Failed to log request metric: {:#}", e);
        }

        Ok(response)
    }

    /// Stop the heartbeat and mark the bot stopped. Idempotent.
    pub async fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.heartbeat.stop();
        if let Some(handle) = self.heartbeat_handle.take() {
            handle.abort();
            let _ = handle.await;
        }

        self.running = false;
        info!("Moltbot stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drive one heartbeat pass without starting the loop
    pub async fn heartbeat_once(&self) {
        self.heartbeat.tick().await;
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsLogger {
        &self.metrics
    }
}

/// Wait for a shutdown request: Ctrl-C, or SIGTERM on unix.
///
/// SIGTERM matters in containers: the process runs as PID 1, which gets
/// no default signal handling, so `docker stop` would otherwise hang
/// until the kill timeout.
#[cfg(target_family = "unix")]
pub async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Failed to listen for Ctrl-C"),
        _ = term.recv() => Ok(()),
    }
}

/// Wait for a shutdown request (Ctrl-C).
#[cfg(not(target_family = "unix"))]
pub async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")
}
