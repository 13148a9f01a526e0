use std::net::SocketAddr;

use cluecrab::config::Config;
use cluecrab::session::approver::ApproverSelection;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::test_session::TestSession;

// Set TEST_LOG to see the server logs while running the tests
static LOGGER: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        std_logger::Config::logfmt().init();
    }
});

pub struct TestApp {
    pub base_address: String,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        TestApp::spawn_app_with_approver(ApproverSelection::RandomCluer).await
    }

    pub async fn spawn_app_with_approver(approver: ApproverSelection) -> TestApp {
        Lazy::force(&LOGGER);

        // Binding to port 0 triggers an OS scan for an available port, this way we can run tests in parallel where each runs its own application
        let random_port_address = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(random_port_address)
            .await
            .expect("Failed to bind to bind random port.");
        let address = listener.local_addr().unwrap();
        std::env::set_var("ENVIRONMENT", "dev");
        let config = {
            let mut config = Config::get().expect("Failed to read configuration.");
            config.session.inactivity_timeout_seconds = 1;
            config.session.approver = approver;
            config
        };

        let server = cluecrab::startup::create_web_server(config, listener);
        let _ = tokio::spawn(server);

        TestApp {
            base_address: format!("127.0.0.1:{}", address.port()),
        }
    }

    pub async fn open_session_websocket(
        &self,
        session_id: &str,
        name: &str,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, String> {
        tokio_tungstenite::connect_async(format!(
            "ws://{}/session/{session_id}/player/{name}/ws",
            self.base_address
        ))
        .await
        .map(|websocket_stream| websocket_stream.0)
        .map_err(|error| format!("WebSocket could not be created. Error: '{error}'."))
    }

    pub async fn create_session(&self) -> String {
        let response = reqwest::Client::new()
            .post(format!("http://{}/session", self.base_address))
            .send()
            .await
            .expect("Failed to execute CreateSession request.");
        assert!(response.status().is_success());

        let response: SessionIdResponse = response
            .json()
            .await
            .expect("Failed to parse SessionIdResponse.");
        assert!(!response.id.is_empty());
        response.id
    }

    pub async fn get_canonical_session_id(&self, session_id: &str) -> String {
        let response = reqwest::Client::new()
            .get(format!("http://{}/session/{session_id}", self.base_address))
            .send()
            .await
            .expect("Failed to execute GetSession request.");
        assert!(response.status().is_success());

        response
            .json::<SessionIdResponse>()
            .await
            .expect("Failed to parse SessionIdResponse.")
            .id
    }

    pub async fn create_session_without_players(self) -> TestSession {
        let id = self.create_session().await;
        TestSession {
            app: self,
            id,
            players: vec![],
        }
    }

    /// A session with players `a`, `b` and `c`, every roster update already read.
    pub async fn create_session_with_players(self) -> TestSession {
        let mut session = self.create_session_without_players().await;
        for name in ["a", "b", "c"] {
            let roster = session.add_player(name).await.unwrap();
            assert!(!roster.started);
        }
        session
    }
}

#[derive(Deserialize)]
struct SessionIdResponse {
    id: String,
}
