use cluecrab::config::Config;
use cluecrab::startup::create_web_server;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    std_logger::Config::logfmt().init();

    let config = Config::get().map_err(|error| {
        log::error!("Unable to read the configuration. Error: '{error}'.");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, error.to_string())
    })?;

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address).await?;

    create_web_server(config, listener).await
}
