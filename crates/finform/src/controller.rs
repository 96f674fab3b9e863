//! Form controller: quarter-field visibility, submission and result rendering.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures::{Stream, StreamExt};
use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

use finform_core::{
    FinancialsBackend, FormError, FormState, PeriodControl, Regions, ResultView,
};

use crate::config::{ControllerConfig, SubmissionPolicy};

/// Events a page delivers to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The year-mode or quarter-mode control changed.
    PeriodChanged(PeriodControl),
    /// The user submitted the form.
    Submitted,
}

/// How a single submission ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The response was rendered and the result panel revealed.
    Rendered,
    /// The submission failed; the status indicator shows the error.
    Failed(FormError),
    /// The submission was ignored because another one was in flight.
    Ignored,
}

impl SubmitOutcome {
    /// Returns true for [`SubmitOutcome::Rendered`].
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }
}

/// Drives one query form.
///
/// The controller owns no page state of its own: it reads the form and
/// mutates the injected [`Regions`], and talks to the server only through the
/// injected [`FinancialsBackend`].
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use finform::{FormController, HttpBackend, MemoryPage};
///
/// let page = MemoryPage::new();
/// let backend = Arc::new(HttpBackend::new("http://127.0.0.1:8000")?);
/// let controller = FormController::new(page.regions(), backend);
///
/// controller.submit().await;
/// println!("{}", finform::render_text(&page.snapshot()));
/// ```
pub struct FormController {
    regions: Regions,
    backend: Arc<dyn FinancialsBackend>,
    config: ControllerConfig,
    in_flight: AtomicBool,
    submissions: AtomicU64,
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("backend", &self.backend.name())
            .field("policy", &self.config.policy)
            .field("submissions", &self.submissions.load(Ordering::Relaxed))
            .finish()
    }
}

/// Clears the in-flight flag when an exclusive submission ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FormController {
    /// Create a controller with the default configuration.
    ///
    /// Construction syncs the quarter-only fields with the quarter-mode
    /// control, so the initial page state matches the control's value.
    pub fn new(regions: Regions, backend: Arc<dyn FinancialsBackend>) -> Self {
        Self::with_config(regions, backend, ControllerConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(
        regions: Regions,
        backend: Arc<dyn FinancialsBackend>,
        config: ControllerConfig,
    ) -> Self {
        let controller = Self {
            regions,
            backend,
            config,
            in_flight: AtomicBool::new(false),
            submissions: AtomicU64::new(0),
        };
        controller.sync_quarter_visibility();
        controller
    }

    /// Create a controller backed by the HTTP backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Config`] when `base_url` is not an absolute URL.
    #[cfg(feature = "http")]
    pub fn http(
        regions: Regions,
        base_url: &str,
        config: ControllerConfig,
    ) -> finform_core::Result<Self> {
        let backend = Arc::new(finform_http::HttpBackend::new(base_url)?);
        Ok(Self::with_config(regions, backend, config))
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns the backend queries are sent to.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn FinancialsBackend> {
        &self.backend
    }

    /// Shows the quarter-only fields when quarter mode is checked, hides them
    /// otherwise.
    pub fn sync_quarter_visibility(&self) {
        let quarter_mode = self.regions.form.quarter_mode();
        self.regions.quarter_fields.set_hidden(!quarter_mode);
    }

    /// Reacts to a change of either period control.
    pub fn on_period_changed(&self, control: PeriodControl) {
        debug!(?control, "Period control changed");
        self.sync_quarter_visibility();
    }

    /// Runs one submission: read the form, query the backend once, render.
    ///
    /// Every failure is caught here, written to the status indicator and
    /// logged; nothing propagates to the caller beyond the outcome.
    #[instrument(skip(self), fields(submission = tracing::field::Empty))]
    pub async fn submit(&self) -> SubmitOutcome {
        let _guard = match self.config.policy {
            SubmissionPolicy::Overlap => None,
            SubmissionPolicy::Exclusive => match self.try_begin_exclusive() {
                Some(guard) => Some(guard),
                None => {
                    warn!("Submission ignored while another is in flight");
                    return SubmitOutcome::Ignored;
                }
            },
        };

        let submission = self.submissions.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::Span::current().record("submission", submission);

        let labels = &self.config.labels;
        self.regions.status.set_text(&labels.querying);
        self.regions.result.set_hidden(true);

        let request = FormState::read(self.regions.form.as_ref()).into_request();
        debug!(
            backend = self.backend.name(),
            symbols = request.payload.symbols.len(),
            period_type = %request.payload.period_type,
            "Submitting query"
        );

        match self.backend.query(&request).await {
            Ok(view) => {
                self.render(&view);
                self.regions.result.set_hidden(false);
                self.regions.status.set_text(&labels.done);
                debug!(
                    columns = view.columns.len(),
                    rows = view.rows.len(),
                    download = view.file_url.is_some(),
                    "Query rendered"
                );
                SubmitOutcome::Rendered
            }
            Err(e) => {
                error!(error = %e, "Financials query failed");
                self.regions.status.set_text(&self.failure_text(&e));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Writes a response into the summary, table and download link.
    ///
    /// The table is cleared first, so nothing of a previous render survives.
    pub fn render(&self, view: &ResultView) {
        let labels = &self.config.labels;
        self.regions
            .summary
            .set_text(view.summary.as_deref().unwrap_or(&labels.no_summary));

        self.regions.table.clear();
        for column in &view.columns {
            self.regions.table.push_header(column);
        }
        for row in &view.rows {
            self.regions.table.push_row(row);
        }

        match &view.file_url {
            Some(href) => self.regions.download.enable(href, &labels.download),
            None => self.regions.download.disable(),
        }
    }

    /// Status text for a failed submission.
    #[must_use]
    pub fn failure_text(&self, err: &FormError) -> String {
        let labels = &self.config.labels;
        let message = match err {
            FormError::Server {
                status,
                detail: None,
            } => format!("{}{status}", labels.request_failed),
            other => other.to_string(),
        };
        format!("{} {message}", labels.failure_marker)
    }

    /// Consumes page events until the stream ends.
    ///
    /// Period changes are handled immediately; each submit runs as its own
    /// task, so submissions overlap exactly as they would on a page. Returns
    /// the outcomes of all submissions in completion order.
    pub async fn run<S>(self: Arc<Self>, events: S) -> Vec<SubmitOutcome>
    where
        S: Stream<Item = ControllerEvent> + Unpin,
    {
        let mut events = events;
        let mut tasks = JoinSet::new();
        let mut outcomes = Vec::new();

        while let Some(event) = events.next().await {
            match event {
                ControllerEvent::PeriodChanged(control) => self.on_period_changed(control),
                ControllerEvent::Submitted => {
                    let controller = Arc::clone(&self);
                    tasks.spawn(async move { controller.submit().await });
                }
            }
            while let Some(done) = tasks.try_join_next() {
                collect(done, &mut outcomes);
            }
        }

        while let Some(done) = tasks.join_next().await {
            collect(done, &mut outcomes);
        }
        outcomes
    }

    fn try_begin_exclusive(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }
}

fn collect(
    done: Result<SubmitOutcome, tokio::task::JoinError>,
    outcomes: &mut Vec<SubmitOutcome>,
) {
    match done {
        Ok(outcome) => outcomes.push(outcome),
        Err(e) => error!(error = %e, "Submission task aborted"),
    }
}
