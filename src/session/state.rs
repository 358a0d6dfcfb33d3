/// Coarse lifecycle of the channel, as shown to the player.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateId {
    Starting,
    Running,
    End,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub state_identifier: StateId,
    #[serde(default)]
    pub state_detail: Vec<String>,
}

impl ConnectionState {
    pub fn new(state_identifier: StateId) -> Self {
        Self {
            state_identifier,
            state_detail: Vec::new(),
        }
    }
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.state_detail.push(detail.into());
        self
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StateId::Starting => write!(f, "starting"),
            StateId::Running => write!(f, "running"),
            StateId::End => write!(f, "end"),
            StateId::Shutdown => write!(f, "shutdown"),
        }
    }
}
