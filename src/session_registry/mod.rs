pub mod actor;
pub mod actor_client;

use rand::distributions::{Alphanumeric, DistString};
use std::collections::HashMap;

use crate::config::SessionSettings;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::session::actor::SessionActor;
use crate::session::actor_client::SessionClient;
use crate::session_registry::actor_client::SessionRegistryClient;

/// Maps session ids to live Session actors. Sessions are created on first
/// reference and forgotten once their actor stops.
pub struct SessionRegistry {
    sessions: HashMap<String, SessionClient>,
    session_settings: SessionSettings,
    words: Vec<String>,
}

impl SessionRegistry {
    const MAXIMUM_SESSION_ID_LENGTH: usize = 64;
    const GENERATED_SESSION_ID_LENGTH: usize = 5;

    pub fn new(session_settings: SessionSettings, words: Vec<String>) -> Self {
        SessionRegistry {
            sessions: HashMap::default(),
            session_settings,
            words,
        }
    }

    pub fn get_or_create_session(
        &mut self,
        session_id: &str,
        registry: SessionRegistryClient,
    ) -> Result<SessionClient, Error> {
        if session_id.trim().is_empty()
            || session_id.chars().count() > SessionRegistry::MAXIMUM_SESSION_ID_LENGTH
        {
            return Err(DomainError::InvalidSessionId(session_id.to_string()).into());
        }

        match self.sessions.get(session_id) {
            Some(session) if !session.is_closed() => Ok(session.clone()),
            _ => {
                log::info!("Creating session. SessionId: '{session_id}'.");
                Ok(self.spawn_session(session_id, registry))
            }
        }
    }

    pub fn create_session(&mut self, registry: SessionRegistryClient) -> String {
        let session_id = self.create_unique_session_id();
        self.spawn_session(&session_id, registry);
        session_id
    }

    /// Forgets a session, unless its id has been taken over by a newer, live
    /// Session actor.
    pub fn remove_session(&mut self, session_id: &str) -> Option<SessionClient> {
        match self.sessions.get(session_id) {
            Some(session) if session.is_closed() => self.sessions.remove(session_id),
            _ => None,
        }
    }

    /// Ids are case-sensitive, but a request for an id that only differs in case
    /// from a live session is pointed at that session.
    pub fn canonical_session_id(&self, session_id: &str) -> String {
        if self.sessions.contains_key(session_id) {
            return session_id.to_string();
        }
        let lowercase_id = session_id.to_lowercase();
        self.sessions
            .keys()
            .find(|existing_id| existing_id.to_lowercase() == lowercase_id)
            .cloned()
            .unwrap_or_else(|| session_id.to_string())
    }

    fn spawn_session(&mut self, session_id: &str, registry: SessionRegistryClient) -> SessionClient {
        let session = SessionActor::spawn(
            session_id,
            self.session_settings.clone(),
            self.words.clone(),
            registry,
        );
        self.sessions
            .insert(session_id.to_string(), session.clone());
        session
    }

    fn create_unique_session_id(&self) -> String {
        loop {
            let id = Alphanumeric
                .sample_string(
                    &mut rand::thread_rng(),
                    SessionRegistry::GENERATED_SESSION_ID_LENGTH,
                )
                .replace('O', "P")
                .replace('0', "1")
                .replace('I', "J")
                .replace('l', "m");
            if self.canonical_session_id(&id) == id && !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }
}
