// Moltbot - personal assistant with a Moltbook presence
// Library exports

// Core modules
pub mod assistant;
pub mod bot;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod heartbeat;
pub mod logging;
pub mod metrics;
pub mod moltbook;
