// Bot lifecycle smoke tests
// The bot must build, start, answer chat, and stop cleanly with the
// Moltbook integration disabled (no credentials, no network)

use std::path::Path;
use std::time::Duration;

use moltbot::bot::Moltbot;
use moltbot::config::BotConfig;

fn offline_config(dir: &Path) -> BotConfig {
    let mut config = BotConfig::new(dir.to_path_buf());
    config.owner_name = "Smokey".to_string();
    config.features.moltbook = false;
    config.check_interval_minutes = 1;
    config
}

#[tokio::test]
async fn test_start_and_stop() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = Moltbot::new(offline_config(dir.path())).unwrap();
    assert!(!bot.is_running());

    bot.start().await.unwrap();
    assert!(bot.is_running());

    // Let the heartbeat take its first pass
    tokio::time::sleep(Duration::from_millis(50)).await;

    bot.stop().await;
    assert!(!bot.is_running());
}

#[tokio::test]
async fn test_start_twice_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = Moltbot::new(offline_config(dir.path())).unwrap();

    bot.start().await.unwrap();
    bot.start().await.unwrap();
    assert!(bot.is_running());

    bot.stop().await;
    bot.stop().await;
    assert!(!bot.is_running());
}

#[tokio::test]
async fn test_missing_api_key_does_not_crash_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = BotConfig::new(dir.path().to_path_buf());
    // Toggle on, no key: the integration must quietly stay off
    config.features.moltbook = true;
    config.moltbook_api_key = None;

    let mut bot = Moltbot::new(config).unwrap();
    bot.start().await.unwrap();

    let reply = bot.chat("post something to moltbook").await.unwrap();
    assert_eq!(reply, "Moltbook integration is currently disabled.");

    bot.stop().await;
}

#[tokio::test]
async fn test_chat_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = Moltbot::new(offline_config(dir.path())).unwrap();
    bot.start().await.unwrap();

    let reply = bot.chat("add task: check the smoke detector").await.unwrap();
    assert!(reply.contains("Task added"));

    let reply = bot.chat("summary please").await.unwrap();
    assert!(reply.contains("Pending tasks: 1"));
    assert!(reply.contains("Moltbook: disabled"));

    bot.stop().await;
}

#[tokio::test]
async fn test_chat_writes_request_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let bot = Moltbot::new(offline_config(dir.path())).unwrap();

    bot.chat("add task: measure things").await.unwrap();
    bot.chat("hello").await.unwrap();

    let summary = bot.metrics().get_today_summary().unwrap();
    assert_eq!(summary.total, 2);
    assert!(summary
        .by_intent
        .iter()
        .any(|(intent, count)| intent == "add_task" && *count == 1));
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let bot = Moltbot::new(offline_config(dir.path())).unwrap();
        bot.chat("add task: survive a restart").await.unwrap();
        bot.chat("remind me to reload").await.unwrap();
    }

    let bot = Moltbot::new(offline_config(dir.path())).unwrap();
    let tasks = bot.coordinator().pending_tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "add task: survive a restart");
    assert_eq!(bot.coordinator().active_reminders().await.len(), 1);
}

#[tokio::test]
async fn test_heartbeat_once_runs_offline() {
    let dir = tempfile::tempdir().unwrap();
    let bot = Moltbot::new(offline_config(dir.path())).unwrap();

    // A single beat with nothing due and no Moltbook is a clean no-op
    bot.heartbeat_once().await;
    assert_eq!(bot.coordinator().stats_snapshot().comments_made, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_sigterm_resolves_shutdown_wait() {
    use tokio::signal::unix::{signal, SignalKind};

    // Register a SIGTERM stream up front so the signal below can never
    // hit the default disposition and take the test binary down with it
    let _guard = signal(SignalKind::terminate()).unwrap();

    let waiter = tokio::spawn(moltbot::bot::shutdown_signal());
    // Yield so the spawned task installs its own handlers first
    tokio::time::sleep(Duration::from_millis(100)).await;

    std::process::Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("SIGTERM did not resolve the shutdown wait")
        .unwrap();
    assert!(result.is_ok());
}
