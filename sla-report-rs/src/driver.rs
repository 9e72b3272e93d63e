//! Report driver
//!
//! Runs the three strictly sequential phases of a report: authenticate the
//! ticketing credential, validate the SLA thresholds, then stream one row
//! per pending request. Rows are produced pull-based; the first row
//! triggers the one-time grouping/reconciliation/notification pipeline
//! whose result is shared by every subsequent row.

use chrono::Utc;
use futures::stream::{self, Stream};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use service_sdk::commerce::{CommerceClient, RequestQuery, RqlFilter};
use service_sdk::error::ServiceError;
use service_sdk::ticketing::TicketingClient;

use crate::grouping::{collect_reviewer_notes, group_notes};
use crate::notify::notify_group;
use crate::params::{ReportParameters, SlaThresholds};
use crate::progress::{Progress, ProgressCallback};
use crate::reconcile::{reconcile_group, GroupReport};
use crate::row::{build_row, ReportRow};

/// Fields excluded from request listings; none of them feed the report
const EXCLUDED_FIELDS: [&str; 5] = [
    "asset.items",
    "asset.params",
    "asset.configuration",
    "activation_key",
    "template",
];

/// Errors that abort a report run
#[derive(Debug, Error)]
pub enum ReportError {
    /// The ticketing credential was rejected (401)
    #[error("Invalid token")]
    InvalidToken,

    /// The credential check failed for another reason
    #[error("Unexpected error occurred: {0}")]
    CredentialCheck(String),

    /// Threshold parsing/validation failed
    #[error("{0}")]
    Configuration(String),

    /// An external service call failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// The report driver: clients plus run parameters
pub struct ReportDriver {
    commerce: CommerceClient,
    ticketing: TicketingClient,
    parameters: ReportParameters,
}

impl ReportDriver {
    /// Create a driver for one report run
    pub fn new(
        commerce: CommerceClient,
        ticketing: TicketingClient,
        parameters: ReportParameters,
    ) -> Self {
        Self {
            commerce,
            ticketing,
            parameters,
        }
    }

    /// Run the authenticate and configure phases, fetch the filtered
    /// request set and hand back a row producer.
    pub async fn start(self, progress_callback: ProgressCallback) -> Result<ReportRun, ReportError> {
        self.authenticate().await?;

        let thresholds =
            SlaThresholds::from_params(&self.parameters).map_err(ReportError::Configuration)?;

        let query = Self::request_query(&self.parameters);
        let requests = self.commerce.list_requests(&query).await?;
        let total = requests.len() as u64;
        info!("Streaming SLA report for {} pending requests", total);

        Ok(ReportRun {
            commerce: self.commerce,
            ticketing: self.ticketing,
            reviewer: self.parameters.reviewer,
            thresholds,
            pending: requests.into_iter(),
            progress: Progress::new(progress_callback, total),
            context: ReportContext::default(),
        })
    }

    /// Verify the ticketing credential before anything else runs
    async fn authenticate(&self) -> Result<(), ReportError> {
        match self.ticketing.myself().await {
            Ok(_) => Ok(()),
            Err(err) if err.is_status(401) => Err(ReportError::InvalidToken),
            Err(err) => Err(ReportError::CredentialCheck(err.to_string())),
        }
    }

    /// Compose the request-listing filter from the run parameters
    fn request_query(parameters: &ReportParameters) -> RequestQuery {
        let mut filter = RqlFilter::eq("status", "pending");

        if let Some(choices) = parameters
            .trans_type
            .as_ref()
            .and_then(|selection| selection.allow_list())
        {
            filter = filter.and(RqlFilter::one_of(
                "asset.connection.type",
                choices.iter().cloned(),
            ));
        }

        if let Some(choices) = parameters
            .product
            .as_ref()
            .and_then(|selection| selection.allow_list())
        {
            filter = filter.and(RqlFilter::one_of(
                "asset.product.id",
                choices.iter().cloned(),
            ));
        }

        RequestQuery::new()
            .filter(filter)
            .exclude(EXCLUDED_FIELDS)
            .order_by("created")
    }
}

/// Memo for the grouping/reconciliation pipeline, computed at most once
/// per run and read-only afterwards
#[derive(Default)]
pub struct ReportContext {
    grouping: Option<Vec<GroupReport>>,
}

impl ReportContext {
    /// Get the grouping result, computing it on first access.
    ///
    /// All groups are reconciled before any conversation is notified, so
    /// the ticketing side is complete before messages go out.
    pub async fn grouping(
        &mut self,
        commerce: &CommerceClient,
        ticketing: &TicketingClient,
        reviewer: &str,
    ) -> Result<&[GroupReport], ReportError> {
        if self.grouping.is_none() {
            debug!("Computing note grouping and ticket reconciliation");

            let entries = collect_reviewer_notes(commerce, reviewer).await?;
            let groups = group_notes(&entries);

            let mut reports = Vec::with_capacity(groups.len());
            for group in &groups {
                reports.push(reconcile_group(ticketing, group).await);
            }

            for report in &reports {
                notify_group(commerce, report).await?;
            }

            self.grouping = Some(reports);
        }

        Ok(self.grouping.as_deref().unwrap_or_default())
    }
}

/// A started report run producing rows one at a time
pub struct ReportRun {
    commerce: CommerceClient,
    ticketing: TicketingClient,
    reviewer: String,
    thresholds: SlaThresholds,
    pending: std::vec::IntoIter<Value>,
    progress: Progress,
    context: ReportContext,
}

impl std::fmt::Debug for ReportRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRun")
            .field("reviewer", &self.reviewer)
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

impl ReportRun {
    /// Total number of rows this run will produce
    pub fn total(&self) -> u64 {
        self.progress.total()
    }

    /// Produce the next row, or `None` when the run is complete.
    ///
    /// The progress callback fires after every row.
    pub async fn next_row(&mut self) -> Result<Option<ReportRow>, ReportError> {
        let Some(request) = self.pending.next() else {
            return Ok(None);
        };

        let groups = self
            .context
            .grouping(&self.commerce, &self.ticketing, &self.reviewer)
            .await?;

        let row = build_row(&request, &self.thresholds, groups, Utc::now());
        self.progress.increment();

        Ok(Some(row))
    }

    /// Adapt the run into a lazy row stream
    pub fn into_stream(self) -> impl Stream<Item = Result<ReportRow, ReportError>> {
        stream::try_unfold(self, |mut run| async move {
            match run.next_row().await? {
                Some(row) => Ok(Some((row, run))),
                None => Ok(None),
            }
        })
    }
}
