use crate::transport::{Document, RequestParams};
use std::collections::BTreeMap;

/// Position of a session inside the catalog UI
///
/// The server describes its whole notion of the session in the hidden
/// fields of the page it last returned, so the cursor keeps exactly that
/// set: every response replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    last_document: Option<Document>,
    hidden_fields: BTreeMap<String, String>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a known hidden-field set
    pub fn with_hidden_fields(hidden_fields: BTreeMap<String, String>) -> Self {
        Self {
            last_document: None,
            hidden_fields,
        }
    }

    pub fn hidden_fields(&self) -> &BTreeMap<String, String> {
        &self.hidden_fields
    }

    pub fn last_document(&self) -> Option<&Document> {
        self.last_document.as_ref()
    }

    /// True until the first response has been absorbed
    pub fn is_fresh(&self) -> bool {
        self.last_document.is_none()
    }

    /// Builds the parameter map of the next request
    ///
    /// Hidden fields come first, caller overrides replace them, and the
    /// action code always wins under `action_key`.
    ///
    /// # Arguments
    ///
    /// * `action_key` - Parameter name of the action code
    /// * `action` - Action code to send
    /// * `extra` - Caller overrides
    pub fn build_params(
        &self,
        action_key: &str,
        action: &str,
        extra: &[(String, String)],
    ) -> RequestParams {
        let mut params = self.hidden_fields.clone();
        for (key, value) in extra {
            params.insert(key.clone(), value.clone());
        }
        params.insert(action_key.to_string(), action.to_string());
        params.into_iter().collect()
    }

    /// Replaces the cursor with the latest response and its hidden fields
    pub fn absorb(&mut self, document: Document, hidden_fields: BTreeMap<String, String>) {
        self.hidden_fields = hidden_fields;
        self.last_document = Some(document);
    }
}
