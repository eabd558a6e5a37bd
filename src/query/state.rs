//! Observable state of one cached list query

use std::sync::Arc;

use crate::models::EntityRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing requested yet
    Idle,
    /// First request in flight, no data yet
    Pending,
    Success,
    Error,
}

/// Snapshot published to every observer of a key
#[derive(Debug, Clone)]
pub struct QueryState {
    pub status: QueryStatus,
    pub data: Option<Arc<Vec<EntityRecord>>>,
    pub error: Option<String>,
    /// A request is in flight, whether or not older data is available
    pub is_fetching: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
        }
    }
}

impl QueryState {
    /// No data has ever arrived and a request is running
    pub fn is_loading(&self) -> bool {
        self.is_fetching && self.data.is_none()
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Records to display; absent data is an empty list
    pub fn records(&self) -> &[EntityRecord] {
        self.data.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.is_fetching = true;
        if self.data.is_none() {
            self.status = QueryStatus::Pending;
        }
    }

    pub(crate) fn resolve(&mut self, data: Arc<Vec<EntityRecord>>) {
        self.status = QueryStatus::Success;
        self.data = Some(data);
        self.error = None;
        self.is_fetching = false;
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.status = QueryStatus::Error;
        self.error = Some(error);
        self.is_fetching = false;
    }
}
