//! Debounced patient search box.
//!
//! Keystrokes are pushed with [`PatientSearch::set_query`]; a background task
//! waits until the query has been quiet for the debounce window and only then
//! asks the gateway. Queries shorter than the minimum length resolve to an
//! empty result without a request.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::PatientGateway;
use crate::config::SearchSettings;
use crate::models::Patient;

/// Latest suggestions, together with the query that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub patients: Vec<Patient>,
}

pub fn is_searchable(query: &str, min_chars: usize) -> bool {
    query.chars().count() >= min_chars
}

pub struct PatientSearch {
    query: watch::Sender<String>,
    results: watch::Receiver<SearchResults>,
    task: JoinHandle<()>,
}

impl PatientSearch {
    pub fn spawn(gateway: Arc<dyn PatientGateway>, settings: &SearchSettings) -> Self {
        let (query, query_rx) = watch::channel(String::new());
        let (results_tx, results) = watch::channel(SearchResults::default());
        let task = tokio::spawn(run(
            gateway,
            settings.debounce(),
            settings.min_query_chars,
            query_rx,
            results_tx,
        ));
        Self { query, results, task }
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.query.send_replace(query.into());
    }

    /// Reset the box after a patient was picked.
    pub fn clear(&self) {
        self.set_query(String::new());
    }

    pub fn results(&self) -> watch::Receiver<SearchResults> {
        self.results.clone()
    }

    pub fn latest(&self) -> SearchResults {
        self.results.borrow().clone()
    }
}

impl Drop for PatientSearch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    gateway: Arc<dyn PatientGateway>,
    debounce: Duration,
    min_chars: usize,
    mut query_rx: watch::Receiver<String>,
    results_tx: watch::Sender<SearchResults>,
) {
    while query_rx.changed().await.is_ok() {
        // Restart the window on every keystroke until the input settles.
        loop {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => break,
                changed = query_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        let query = query_rx.borrow_and_update().clone();
        let patients = if is_searchable(&query, min_chars) {
            debug!(%query, "searching patients");
            gateway.search_patients(&query).await
        } else {
            Vec::new()
        };
        results_tx.send_replace(SearchResults { query, patients });
    }
}
