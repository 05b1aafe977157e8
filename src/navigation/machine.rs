use crate::config::Config;
use crate::navigation::classify::{self, ChildAction, NavigationResult, NodeKind};
use crate::navigation::{hidden, ActionCode, NavError};
use crate::state::{ReturnFrame, Session};
use crate::transport::{Document, RequestParams, Transport};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Label used in errors and logs for the parameterless first request
const ROOT_ACTION: &str = "<root>";

/// Drives one session through the catalog UI
///
/// The navigator itself is stateless and shared by every worker; all state
/// lives in the `Session` passed to each call.
pub struct Navigator {
    transport: Arc<dyn Transport>,
    action_key: String,
    request_delay: Duration,
}

/// Outcome of popping and replaying one return frame
pub struct Ascent {
    pub frame: ReturnFrame,
    pub result: Result<NavigationResult, NavError>,
}

impl Navigator {
    /// Creates a navigator over a transport
    ///
    /// # Arguments
    ///
    /// * `transport` - Sends the requests of every session
    /// * `action_key` - Query parameter carrying the action code (`ICAction`)
    /// * `request_delay` - Courtesy pause awaited after every request
    pub fn new(
        transport: Arc<dyn Transport>,
        action_key: impl Into<String>,
        request_delay: Duration,
    ) -> Self {
        Self {
            transport,
            action_key: action_key.into(),
            request_delay,
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self::new(
            transport,
            config.target.action_key.clone(),
            Duration::from_millis(config.crawler.request_delay_ms),
        )
    }

    pub fn action_key(&self) -> &str {
        &self.action_key
    }

    /// Loads the root page with no parameters
    ///
    /// # Arguments
    ///
    /// * `session` - A fresh session; its cursor absorbs the root page
    ///
    /// # Returns
    ///
    /// * `Ok(NavigationResult)` - The classified root page
    /// * `Err(NavError)` - Transport failure or an unrecognised page
    pub async fn enter_root(&self, session: &mut Session) -> Result<NavigationResult, NavError> {
        self.send(session, ROOT_ACTION, Vec::new()).await
    }

    /// Sends `action` on top of the session's hidden fields
    ///
    /// # Arguments
    ///
    /// * `session` - Session whose hidden fields are echoed and then replaced
    /// * `action` - Action code sent under the action key
    /// * `extra` - Parameters layered over the hidden fields (the action key
    ///   still wins)
    ///
    /// # Returns
    ///
    /// * `Ok(NavigationResult)` - The classified response
    /// * `Err(NavError::Transport)` - Retries exhausted; the cursor is untouched
    /// * `Err(NavError::Classification)` - The response matched no node
    ///   shape; the cursor has still absorbed it
    pub async fn enter(
        &self,
        session: &mut Session,
        action: &ActionCode,
        extra: &[(String, String)],
    ) -> Result<NavigationResult, NavError> {
        let params = session
            .cursor()
            .build_params(&self.action_key, action.as_str(), extra);
        self.send(session, action.as_str(), params).await
    }

    /// Replays a return action expected to land on an `expected` page
    ///
    /// The page reached is returned whatever its kind; use [`ensure_kind`]
    /// to turn a mismatch into an error.
    ///
    /// # Arguments
    ///
    /// * `session` - Session positioned on the child page
    /// * `action` - Return action of the child
    /// * `expected` - Kind of the parent page
    pub async fn return_to(
        &self,
        session: &mut Session,
        action: &ActionCode,
        expected: NodeKind,
    ) -> Result<NavigationResult, NavError> {
        let result = self.enter(session, action, &[]).await?;
        if result.kind() != expected {
            tracing::debug!(
                "{}: {} reached a {} page instead of {}",
                session.label(),
                action,
                result.kind(),
                expected
            );
        }
        Ok(result)
    }

    /// Records the way back out of a node just entered
    pub fn descend(&self, session: &mut Session, frame: ReturnFrame) {
        tracing::trace!(
            "{}: descend into {} (depth {})",
            session.label(),
            frame.level,
            session.path().depth() + 1
        );
        session.path_mut().push(frame);
    }

    /// Pops the innermost frame and replays its return action
    ///
    /// Returns `None` when the path is already empty.
    ///
    /// # Returns
    ///
    /// * `Some(Ascent)` - The popped frame and the outcome of its return action
    /// * `None` - Nothing left to return from
    pub async fn ascend(&self, session: &mut Session) -> Option<Ascent> {
        let frame = session.path_mut().pop()?;
        let result = self.return_to(session, &frame.action, frame.expect).await;
        Some(Ascent { frame, result })
    }

    async fn send(
        &self,
        session: &mut Session,
        action: &str,
        params: RequestParams,
    ) -> Result<NavigationResult, NavError> {
        tracing::debug!("{}: {} ({} params)", session.label(), action, params.len());
        session.record_request();

        let fetched = self.transport.fetch(&params, session.token()).await;

        // Courtesy delay after every request, failed ones included
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let document = fetched.map_err(|source| NavError::Transport {
            action: action.to_string(),
            source,
        })?;

        let (hidden_fields, classified) = analyze(&document);
        session.cursor_mut().absorb(document.clone(), hidden_fields);

        match classified {
            Some((kind, children)) => Ok(NavigationResult::new(kind, document, children)),
            None => Err(NavError::Classification {
                action: action.to_string(),
                reason: "page matches no known node shape".to_string(),
            }),
        }
    }
}

/// Checks that a page reached by a return action has the expected kind
///
/// # Returns
///
/// * `Ok(())` - The page has the expected kind
/// * `Err(NavError::ReturnState)` - The return landed somewhere else
pub fn ensure_kind(
    result: &NavigationResult,
    expected: NodeKind,
    action: &ActionCode,
) -> Result<(), NavError> {
    if result.kind() == expected {
        Ok(())
    } else {
        Err(NavError::ReturnState {
            action: action.to_string(),
            expected,
            actual: result.kind(),
        })
    }
}

type Classified = Option<(NodeKind, Vec<ChildAction>)>;

/// Parses a response once for its hidden fields and its shape
fn analyze(document: &Document) -> (BTreeMap<String, String>, Classified) {
    let html = document.html();
    let hidden_fields = hidden::hidden_fields_in(&html);
    let classified =
        classify::classify_html(&html).map(|kind| (kind, classify::children(kind, &html)));
    (hidden_fields, classified)
}
