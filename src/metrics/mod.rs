use lazy_static::lazy_static;
use prometheus::{IntCounter, IntGauge, Registry};
use std::sync::Once;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_SESSIONS: IntGauge =
        IntGauge::new("cluecrab_active_sessions", "Active sessions").expect("metric cannot be created");
    pub static ref CONNECTED_PLAYERS: IntGauge =
        IntGauge::new("cluecrab_connected_players", "Amount of players connected")
            .expect("metric cannot be created");
    pub static ref ROUNDS_STARTED: IntCounter =
        IntCounter::new("cluecrab_rounds_started", "Rounds started since boot")
            .expect("metric cannot be created");
    pub static ref GUESSES_RESOLVED: IntCounter =
        IntCounter::new("cluecrab_guesses_resolved", "Rounds resolved by a guess since boot")
            .expect("metric cannot be created");
}

static REGISTER: Once = Once::new();

/// Can be called more than once, only the first call registers the collectors.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(ACTIVE_SESSIONS.clone()))
            .expect("collector cannot be registered");

        REGISTRY
            .register(Box::new(CONNECTED_PLAYERS.clone()))
            .expect("collector cannot be registered");

        REGISTRY
            .register(Box::new(ROUNDS_STARTED.clone()))
            .expect("collector cannot be registered");

        REGISTRY
            .register(Box::new(GUESSES_RESOLVED.clone()))
            .expect("collector cannot be registered");
    });
}
