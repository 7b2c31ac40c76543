use anyhow::Result;
use indexmap::IndexSet;
use reqwest::Client;
use shared::{domain::ActivityCatalog, error::ApiRejection, protocol::CommandReceipt};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};
use url::Url;

pub mod notice;
pub mod projection;
pub mod settings;

/// Shown in place of the card list when a catalog fetch has failed.
pub const LOAD_FAILURE_TEXT: &str = "Failed to load activities. Please try again later.";
/// Shown in place of the card list when the projection is empty.
pub const NO_ACTIVITIES_TEXT: &str = "No activities found.";

/// Point-in-time copy of the controller's view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    pub catalog: ActivityCatalog,
    pub categories: Vec<String>,
    pub load_failed: bool,
}

#[derive(Debug, Clone)]
pub enum BoardEvent {
    CatalogUpdated(BoardSnapshot),
    CatalogLoadFailed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    SignUp,
    Unregister,
}

impl CommandKind {
    /// Route segment for the command, also used as its log label.
    fn action(self) -> &'static str {
        match self {
            CommandKind::SignUp => "signup",
            CommandKind::Unregister => "unregister",
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    /// The service processed the request and refused it.
    #[error("command rejected: {}", detail.as_deref().unwrap_or("no detail provided"))]
    Rejected { detail: Option<String> },
    /// The request never yielded a decodable response.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The configured server URL cannot carry endpoint paths.
    #[error("server url '{url}' cannot carry endpoint paths")]
    InvalidBase { url: String },
}

impl CommandError {
    /// Text shown to the user in the message area for a failed command.
    pub fn user_message(&self, kind: CommandKind) -> String {
        match self {
            CommandError::Rejected { detail } => detail
                .clone()
                .unwrap_or_else(|| "An error occurred".to_string()),
            CommandError::Transport(_) | CommandError::InvalidBase { .. } => match kind {
                CommandKind::SignUp => "Failed to sign up. Please try again.".to_string(),
                CommandKind::Unregister => "Failed to unregister. Please try again.".to_string(),
            },
        }
    }
}

/// Client-side controller for the activity board: holds the catalog
/// replica, refreshes it from the service, and dispatches signup and
/// unregister commands.
pub struct BoardClient {
    http: Client,
    base_url: Url,
    inner: Mutex<BoardSnapshot>,
    events: broadcast::Sender<BoardEvent>,
}

impl BoardClient {
    pub fn new(server_url: Url) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            http: Client::new(),
            base_url: server_url,
            inner: Mutex::new(BoardSnapshot::default()),
            events,
        }
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        self.inner.lock().await.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Replaces the catalog replica with the service's current state.
    ///
    /// On failure the previous catalog is retained and only the
    /// load-failed flag changes.
    pub async fn refresh_catalog(&self) -> Result<BoardSnapshot> {
        match self.try_fetch_catalog().await {
            Ok(catalog) => {
                let snapshot = {
                    let mut guard = self.inner.lock().await;
                    guard.categories = distinct_categories(&catalog);
                    guard.catalog = catalog;
                    guard.load_failed = false;
                    guard.clone()
                };
                info!(activities = snapshot.catalog.len(), "catalog refreshed");
                let _ = self
                    .events
                    .send(BoardEvent::CatalogUpdated(snapshot.clone()));
                Ok(snapshot)
            }
            Err(err) => {
                {
                    let mut guard = self.inner.lock().await;
                    guard.load_failed = true;
                }
                error!("catalog refresh failed: {err}");
                let _ = self.events.send(BoardEvent::CatalogLoadFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    pub async fn sign_up(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<CommandReceipt, CommandError> {
        self.execute_command(CommandKind::SignUp, activity, email)
            .await
    }

    pub async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<CommandReceipt, CommandError> {
        self.execute_command(CommandKind::Unregister, activity, email)
            .await
    }

    // No status check: any body that decodes as a catalog replaces
    // local state.
    async fn try_fetch_catalog(&self) -> Result<ActivityCatalog> {
        let url = self.endpoint(&["activities"])?;
        let catalog = self.http.get(url).send().await?.json().await?;
        Ok(catalog)
    }

    async fn execute_command(
        &self,
        kind: CommandKind,
        activity: &str,
        email: &str,
    ) -> Result<CommandReceipt, CommandError> {
        let mut url = self.endpoint(&["activities", activity, kind.action()])?;
        url.query_pairs_mut().append_pair("email", email);

        let request = match kind {
            CommandKind::SignUp => self.http.post(url),
            CommandKind::Unregister => self.http.delete(url),
        };
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let receipt: CommandReceipt = response.json().await?;
            info!(activity, command = kind.action(), "command accepted");
            // A failed follow-up refresh flips the load-failed flag; the
            // accepted command outcome stands regardless.
            let _ = self.refresh_catalog().await;
            Ok(receipt)
        } else {
            let rejection: ApiRejection = response.json().await?;
            warn!(
                activity,
                command = kind.action(),
                status = status.as_u16(),
                "command rejected"
            );
            Err(CommandError::Rejected {
                detail: rejection.detail,
            })
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CommandError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CommandError::InvalidBase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn distinct_categories(catalog: &ActivityCatalog) -> Vec<String> {
    let mut seen = IndexSet::new();
    for activity in catalog.values() {
        if let Some(category) = activity.category.as_deref() {
            if !category.is_empty() {
                seen.insert(category.to_string());
            }
        }
    }
    seen.into_iter().collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
