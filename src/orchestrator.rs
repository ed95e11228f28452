use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::client::WeatherBackend;
use crate::models::{
    ChartSeries, FormInput, LocationQuery, OperationResult, RawSeriesResponse, TableRow,
};
use crate::transform::{to_chart_series, to_table_rows};
use crate::transport_error::TransportError;
use crate::validation::{self, ValidationError};

/// Where a submission currently is. `Failed` is reachable from the three
/// working stages; `Done` only from `Fetching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SubmissionStage {
    #[default]
    Idle,
    Validating,
    Storing,
    Fetching,
    Done,
    Failed,
}

/// Everything the dashboard renders after a successful submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    pub raw: RawSeriesResponse,
    pub chart: Option<ChartSeries>,
    pub table: Vec<TableRow>,
    pub query: LocationQuery,
    pub storage_key: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Failed to store weather data: {0}")]
    Store(TransportError),
    #[error("Failed to load stored weather data: {0}")]
    Fetch(TransportError),
}

impl SubmitError {
    /// Stage the submission was in when it failed
    pub fn stage(&self) -> SubmissionStage {
        match self {
            SubmitError::Validation(_) => SubmissionStage::Validating,
            SubmitError::Store(_) => SubmissionStage::Storing,
            SubmitError::Fetch(_) => SubmissionStage::Fetching,
        }
    }

    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            SubmitError::Store(e) | SubmitError::Fetch(e) => Some(e),
            SubmitError::Validation(_) => None,
        }
    }
}

#[derive(Default)]
struct Slot {
    stage: SubmissionStage,
    applied_sequence: u64,
    result: Option<OperationResult<DashboardState>>,
}

/// Shared "latest submission wins" state.
///
/// Each submission takes a sequence number when it starts. Stage changes and
/// the final result are only applied while that number is the newest one
/// issued, so a slow older submission can never overwrite a newer one.
#[derive(Default)]
pub struct LatestSubmission {
    issued: AtomicU64,
    slot: Mutex<Slot>,
}

impl LatestSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, sequence: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == sequence
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn advance(&self, sequence: u64, stage: SubmissionStage) {
        let mut slot = self.lock();
        if self.is_current(sequence) {
            debug!(sequence, ?stage, "Submission stage change");
            slot.stage = stage;
        }
    }

    /// Apply a finished submission's result. Returns `false` when a newer
    /// submission has started since, in which case nothing changes.
    pub fn publish(&self, sequence: u64, result: OperationResult<DashboardState>) -> bool {
        let mut slot = self.lock();
        if !self.is_current(sequence) || sequence <= slot.applied_sequence {
            debug!(
                sequence,
                newest = self.issued.load(Ordering::SeqCst),
                "Discarding stale submission result"
            );
            return false;
        }

        slot.stage = if result.is_success() {
            SubmissionStage::Done
        } else {
            SubmissionStage::Failed
        };
        slot.applied_sequence = sequence;
        slot.result = Some(result);
        true
    }

    pub fn stage(&self) -> SubmissionStage {
        self.lock().stage
    }

    /// Sequence number of the result currently shown, 0 if none yet
    pub fn applied_sequence(&self) -> u64 {
        self.lock().applied_sequence
    }

    pub fn result(&self) -> Option<OperationResult<DashboardState>> {
        self.lock().result.clone()
    }
}

/// Runs a form submission: validate, store, fetch, transform.
///
/// Stages run strictly in order and stop at the first failure. Nothing is
/// retried.
pub struct Orchestrator<B> {
    backend: B,
    latest: Arc<LatestSubmission>,
    reference_day: Option<NaiveDate>,
}

impl<B: WeatherBackend> Orchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            latest: Arc::new(LatestSubmission::new()),
            reference_day: None,
        }
    }

    /// Validate date ranges against a fixed day instead of the current one
    pub fn with_reference_day(mut self, day: NaiveDate) -> Self {
        self.reference_day = Some(day);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn latest(&self) -> Arc<LatestSubmission> {
        Arc::clone(&self.latest)
    }

    /// Run a submission and wrap the outcome in the `{success, data, error}` envelope
    pub async fn submit(&self, form: &FormInput) -> OperationResult<DashboardState> {
        self.run(form).await.into()
    }

    /// Run a submission, keeping the typed error
    #[instrument(skip(self, form))]
    pub async fn run(&self, form: &FormInput) -> Result<DashboardState, SubmitError> {
        let sequence = self.latest.begin();
        let outcome = self.run_stages(sequence, form).await;

        let envelope = match &outcome {
            Ok(state) => {
                info!(
                    sequence,
                    rows = state.table.len(),
                    storage_key = %state.storage_key,
                    "Submission completed"
                );
                OperationResult::ok(state.clone())
            }
            Err(e) => {
                warn!(sequence, stage = ?e.stage(), error = %e, "Submission failed");
                OperationResult::failed(e.to_string())
            }
        };
        self.latest.publish(sequence, envelope);

        outcome
    }

    async fn run_stages(
        &self,
        sequence: u64,
        form: &FormInput,
    ) -> Result<DashboardState, SubmitError> {
        self.latest.advance(sequence, SubmissionStage::Validating);
        let query = match self.reference_day {
            Some(day) => validation::validate_query_as_of(form, day)?,
            None => validation::validate_query(form)?,
        };

        self.latest.advance(sequence, SubmissionStage::Storing);
        let receipt = self
            .backend
            .store(&query)
            .await
            .map_err(SubmitError::Store)?;
        debug!(filename = %receipt.filename, "Stored weather data");

        self.latest.advance(sequence, SubmissionStage::Fetching);
        let raw = self
            .backend
            .retrieve(&receipt.filename)
            .await
            .map_err(SubmitError::Fetch)?;

        let chart = to_chart_series(Some(&raw));
        let table = to_table_rows(Some(&raw));

        Ok(DashboardState {
            raw,
            chart,
            table,
            query,
            storage_key: receipt.filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DashboardState {
        let form = FormInput::new(1.0, 2.0, "2023-01-01", "2023-01-02");
        let query =
            validation::validate_query_as_of(&form, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
                .unwrap();
        DashboardState {
            raw: RawSeriesResponse::default(),
            chart: None,
            table: Vec::new(),
            query,
            storage_key: "k.json".to_string(),
        }
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let latest = LatestSubmission::new();
        assert_eq!(latest.begin(), 1);
        assert_eq!(latest.begin(), 2);
        assert!(latest.is_current(2));
        assert!(!latest.is_current(1));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let latest = LatestSubmission::new();
        let older = latest.begin();
        let newer = latest.begin();

        assert!(latest.publish(newer, OperationResult::ok(state())));
        assert!(!latest.publish(older, OperationResult::failed("late failure")));

        assert_eq!(latest.applied_sequence(), newer);
        assert_eq!(latest.stage(), SubmissionStage::Done);
        assert!(latest.result().unwrap().is_success());
    }

    #[test]
    fn test_stale_stage_changes_are_ignored() {
        let latest = LatestSubmission::new();
        let older = latest.begin();
        let newer = latest.begin();

        latest.advance(newer, SubmissionStage::Storing);
        latest.advance(older, SubmissionStage::Fetching);
        assert_eq!(latest.stage(), SubmissionStage::Storing);
    }

    #[test]
    fn test_failure_marks_failed() {
        let latest = LatestSubmission::new();
        let seq = latest.begin();
        assert_eq!(latest.stage(), SubmissionStage::Idle);

        assert!(latest.publish(seq, OperationResult::failed("nope")));
        assert_eq!(latest.stage(), SubmissionStage::Failed);
        assert_eq!(latest.result().unwrap().error(), Some("nope"));
    }

    #[test]
    fn test_submit_error_stage() {
        let err = SubmitError::Store(TransportError::Unreachable("refused".into()));
        assert_eq!(err.stage(), SubmissionStage::Storing);
        assert!(err.transport().is_some());
        assert!(err.to_string().starts_with("Failed to store weather data"));

        let err = SubmitError::from(ValidationError::InvertedRange);
        assert_eq!(err.stage(), SubmissionStage::Validating);
        assert_eq!(
            err.to_string(),
            "Start date must be before or equal to end date"
        );
    }
}
