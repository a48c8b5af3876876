//! BrowseSessionsHandler - Query handler for the session browse view.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::session::{Session, SessionError};
use crate::ports::{SessionBrowser, SessionFilter};

/// Query for joinable sessions.
#[derive(Debug, Clone, Default)]
pub struct BrowseSessionsQuery {
    pub filter: SessionFilter,
}

/// Handler for browsing open sessions.
pub struct BrowseSessionsHandler {
    browser: Arc<dyn SessionBrowser>,
}

impl BrowseSessionsHandler {
    pub fn new(browser: Arc<dyn SessionBrowser>) -> Self {
        Self { browser }
    }

    pub async fn handle(&self, query: BrowseSessionsQuery) -> Result<Vec<Session>, SessionError> {
        let now = Timestamp::now();
        let sessions = self.browser.browse(&query.filter, &now).await?;
        Ok(sessions)
    }
}
