//! Concurrent source aggregation
//!
//! One task per source client is spawned into a [`JoinSet`] for each call.
//! Results are collected at a single fan-in point until every task has
//! finished or the wall-clock deadline elapses, whichever comes first.
//! Tasks still running at the deadline are aborted and contribute nothing.
//! Per-source failures are logged and reported, never returned as errors.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

use crate::api::{http_client, FStreamClient, MovixTmdbClient, SourceClient, VixsrcClient};
use crate::config::Config;
use crate::models::{AggregationOutcome, FetchStatus, MediaRequest, ProviderReport, StreamingSource};

/// Deadline used when the caller has no preference
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Fans a media request out to every configured source client
#[derive(Clone)]
pub struct Aggregator {
    clients: Vec<Arc<dyn SourceClient>>,
}

impl Aggregator {
    pub fn new(clients: Vec<Arc<dyn SourceClient>>) -> Self {
        Self { clients }
    }

    /// The three reference clients against one service base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self::new(vec![
            Arc::new(MovixTmdbClient::with_base_url(base_url.clone())),
            Arc::new(FStreamClient::with_base_url(base_url.clone())),
            Arc::new(VixsrcClient::with_base_url(base_url)),
        ])
    }

    /// The three reference clients sharing one HTTP client built from config
    pub fn from_config(config: &Config) -> Self {
        let client = http_client(config.request_timeout());
        let base_url = config.base_url();
        Self::new(vec![
            Arc::new(MovixTmdbClient::with_client(base_url, client.clone())),
            Arc::new(FStreamClient::with_client(base_url, client.clone())),
            Arc::new(VixsrcClient::with_client(base_url, client)),
        ])
    }

    pub fn clients(&self) -> &[Arc<dyn SourceClient>] {
        &self.clients
    }

    /// Allow-list filtered union of every source that answered before `deadline`
    pub async fn fetch_sources(
        &self,
        request: &MediaRequest,
        deadline: Duration,
    ) -> Vec<StreamingSource> {
        self.fetch_outcome(request, deadline).await.sources
    }

    /// Same as [`fetch_sources`](Self::fetch_sources), plus a per-source report
    pub async fn fetch_outcome(
        &self,
        request: &MediaRequest,
        deadline: Duration,
    ) -> AggregationOutcome {
        let started = Instant::now();
        // None means the deadline lies beyond what the clock can represent
        let deadline_at = tokio::time::Instant::now().checked_add(deadline);

        let mut tasks = JoinSet::new();
        let mut task_index: HashMap<Id, usize> = HashMap::with_capacity(self.clients.len());
        for (index, client) in self.clients.iter().enumerate() {
            let client = Arc::clone(client);
            let request = *request;
            let handle = tasks.spawn(async move {
                let fetch_started = Instant::now();
                let result = client.fetch(&request).await;
                (index, result, fetch_started.elapsed())
            });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<(FetchStatus, Vec<StreamingSource>, Duration)>> =
            (0..self.clients.len()).map(|_| None).collect();
        let mut timed_out = false;

        loop {
            let next = match deadline_at {
                Some(at) => tokio::time::timeout_at(at, tasks.join_next()).await,
                None => Ok(tasks.join_next().await),
            };
            match next {
                Ok(Some(Ok((index, result, elapsed)))) => {
                    let kind = self.clients[index].kind();
                    let entry = match result {
                        Ok(sources) => {
                            debug!("{} returned {} sources in {:?}", kind, sources.len(), elapsed);
                            (FetchStatus::Succeeded { count: sources.len() }, sources, elapsed)
                        }
                        Err(e) => {
                            warn!("{} fetch failed for {}: {}", kind, request, e);
                            (
                                FetchStatus::Failed {
                                    reason: e.to_string(),
                                },
                                Vec::new(),
                                elapsed,
                            )
                        }
                    };
                    slots[index] = Some(entry);
                }
                Ok(Some(Err(e))) => {
                    warn!("Source task for {} did not complete: {}", request, e);
                    if let Some(&index) = task_index.get(&e.id()) {
                        slots[index] = Some((
                            FetchStatus::Failed {
                                reason: "task aborted".to_string(),
                            },
                            Vec::new(),
                            started.elapsed(),
                        ));
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    timed_out = true;
                    break;
                }
            }
        }

        // Dropping the set would abort as well; be explicit about it
        tasks.abort_all();

        let mut sources = Vec::new();
        let mut reports = Vec::with_capacity(self.clients.len());
        for (client, slot) in self.clients.iter().zip(slots) {
            let kind = client.kind();
            let (status, found, elapsed) = match slot {
                Some(entry) => entry,
                None if timed_out => {
                    warn!("{} did not answer within {:?} for {}", kind, deadline, request);
                    (FetchStatus::TimedOut, Vec::new(), started.elapsed())
                }
                None => (
                    FetchStatus::Failed {
                        reason: "task aborted".to_string(),
                    },
                    Vec::new(),
                    started.elapsed(),
                ),
            };
            sources.extend(found);
            reports.push(ProviderReport {
                source: kind,
                status,
                elapsed_ms: elapsed.as_millis() as u64,
            });
        }

        let collected = sources.len();
        sources.retain(|s| s.provider.is_known() && !s.url.is_empty());

        info!(
            "Aggregated {} sources for {} ({}/{} providers ok, {} dropped by allow-list) in {:?}",
            sources.len(),
            request,
            reports.iter().filter(|r| r.status.is_success()).count(),
            reports.len(),
            collected - sources.len(),
            started.elapsed()
        );

        AggregationOutcome { sources, reports }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
