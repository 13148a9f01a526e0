pub mod actor;

/// The form under which a name is stored on the roster and looked up.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// A roster entry. Membership is by name; a member may hold several
/// connections at once (e.g. a reloaded browser tab whose old socket has not
/// timed out yet).
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub name: String,
    connections: usize,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            connections: 1,
        }
    }

    pub fn connections(&self) -> usize {
        self.connections
    }

    pub fn is_connected(&self) -> bool {
        self.connections > 0
    }

    pub(crate) fn connect(&mut self) {
        self.connections += 1;
    }

    pub(crate) fn disconnect(&mut self) {
        self.connections = self.connections.saturating_sub(1);
    }
}
