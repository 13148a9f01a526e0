use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::metrics::register_metrics;
use crate::routes;
use crate::session_registry::actor::SessionRegistryActor;
use crate::words::{read_words_from_file, ShuffledWords};

pub async fn create_web_server(config: Config, listener: TcpListener) -> Result<(), std::io::Error> {
    register_metrics();

    let words = match read_words_from_file(&config.session.words_file) {
        Ok(words) => words,
        Err(error) => {
            log::error!(
                "Falling back to the built-in words. File: '{}', Error: '{error}'.",
                config.session.words_file
            );
            ShuffledWords::default_words()
        }
    };
    log::info!(
        "Words loaded. File: '{}', Words: '{}'.",
        config.session.words_file,
        words.len()
    );

    let registry = Arc::new(SessionRegistryActor::spawn(config.session.clone(), words));
    let router = routes::create_router(&config).with_state(registry);

    log::info!("Listening on {:?}", listener.local_addr());
    axum::serve(listener, router).await
}
