//! Staged execution cycle.

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};
use trend_contracts::ContractResolver;
use trend_core::error::{ConnectionError, DataFetchError, MetadataFetchError, SubmissionError};
use trend_core::traits::{MarketDataSource, OrderGateway, SessionProvider};
use trend_core::types::{
    Bar, InstrumentDescriptor, InstrumentSnapshot, OrderIntent, PriceSeries, Session,
    StrategyParams, TradingMode, Universe,
};
use trend_gates::GateDecision;
use trend_indicators::IndicatorEngine;

use crate::error::{CoordinatorError, CycleError};
use crate::outcome::{InstrumentOutcome, OutcomeStatus};
use crate::report::{CycleStatus, CycleSummary};
use crate::settings::ExecutionSettings;

/// Stage of the cycle currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Idle,
    Connecting,
    Fetching,
    Computing,
    Gating,
    Submitting,
    Done,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Connecting => "connecting",
            CyclePhase::Fetching => "fetching",
            CyclePhase::Computing => "computing",
            CyclePhase::Gating => "gating",
            CyclePhase::Submitting => "submitting",
            CyclePhase::Done => "done",
        };
        write!(f, "{}", s)
    }
}

/// Runs one strategy cycle at a time against injected collaborators.
pub struct ExecutionCoordinator {
    sessions: Arc<dyn SessionProvider>,
    data: Arc<dyn MarketDataSource>,
    gateway: Arc<dyn OrderGateway>,
    universe: Universe,
    params: StrategyParams,
    settings: ExecutionSettings,
    indicators: IndicatorEngine,
    cycle_lock: Mutex<()>,
    phase: watch::Sender<CyclePhase>,
}

impl ExecutionCoordinator {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        data: Arc<dyn MarketDataSource>,
        gateway: Arc<dyn OrderGateway>,
        universe: Universe,
        params: StrategyParams,
        settings: ExecutionSettings,
    ) -> Result<Self, CoordinatorError> {
        params.validate()?;
        if settings.max_concurrency == 0 {
            return Err(CoordinatorError::Settings(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        let indicators = IndicatorEngine::from_params(&params)?;
        let (phase, _) = watch::channel(CyclePhase::Idle);

        Ok(Self {
            sessions,
            data,
            gateway,
            universe,
            params,
            settings,
            indicators,
            cycle_lock: Mutex::new(()),
            phase,
        })
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    /// Phase of the running (or last) cycle.
    pub fn phase(&self) -> CyclePhase {
        *self.phase.borrow()
    }

    /// Run one full cycle for `date`.
    ///
    /// Only a failed connection (or an overlapping call) is an error; every
    /// per-instrument problem is reported in the returned summary. Setting
    /// `shutdown` to `true` stops new fetches and submissions from starting.
    pub async fn run_cycle(
        &self,
        date: NaiveDate,
        mode: TradingMode,
        shutdown: Option<watch::Receiver<bool>>,
    ) -> Result<CycleSummary, CycleError> {
        self.execute(date, mode, shutdown.as_ref(), true).await
    }

    /// Run a cycle up to and including gate evaluation, never submitting.
    pub async fn preview(
        &self,
        date: NaiveDate,
        mode: TradingMode,
    ) -> Result<CycleSummary, CycleError> {
        self.execute(date, mode, None, false).await
    }

    async fn execute(
        &self,
        date: NaiveDate,
        mode: TradingMode,
        shutdown: Option<&watch::Receiver<bool>>,
        submit: bool,
    ) -> Result<CycleSummary, CycleError> {
        let _cycle = self
            .cycle_lock
            .try_lock()
            .map_err(|_| CycleError::CycleInProgress)?;

        let started_at = Utc::now();
        info!(
            %date,
            %mode,
            instruments = self.universe.len(),
            dry_run = self.settings.dry_run,
            "Starting cycle"
        );

        self.enter(CyclePhase::Connecting);
        let connected = self
            .call(
                self.sessions.connect(mode),
                ConnectionError::Unreachable("connection timed out".to_string()),
            )
            .await;
        let session = match connected {
            Ok(session) => session,
            Err(e) => {
                error!(provider = self.sessions.name(), error = %e, "Session connection failed");
                self.enter(CyclePhase::Idle);
                return Err(e.into());
            }
        };
        info!(session = %session.id, venue = %session.venue, "Session connected");

        let session = Mutex::new(session);
        let (status, gate, outcomes) = self.run_connected(&session, date, shutdown, submit).await;

        self.sessions.disconnect(session.into_inner()).await;
        self.enter(CyclePhase::Done);

        let summary = CycleSummary::new(date, mode, status, gate, outcomes, started_at);
        info!(
            status = %summary.status,
            computed = summary.counts.computed,
            submitted = summary.counts.submitted,
            fetch_failures = summary.counts.fetch_failures,
            resolution_failures = summary.counts.resolution_failures,
            submission_failures = summary.counts.submission_failures,
            "Cycle finished"
        );

        Ok(summary)
    }

    async fn run_connected(
        &self,
        session: &Mutex<Session>,
        date: NaiveDate,
        shutdown: Option<&watch::Receiver<bool>>,
        submit: bool,
    ) -> (CycleStatus, Option<GateDecision>, Vec<InstrumentOutcome>) {
        self.enter(CyclePhase::Fetching);
        let fetched: Vec<(&InstrumentDescriptor, Result<Vec<Bar>, InstrumentOutcome>)> =
            stream::iter(self.universe.iter())
                .map(move |instrument| async move {
                    (instrument, self.fetch(session, instrument, date, shutdown).await)
                })
                .buffered(self.settings.max_concurrency)
                .collect()
                .await;

        self.enter(CyclePhase::Computing);
        let outcomes: Vec<InstrumentOutcome> = fetched
            .into_iter()
            .map(|(instrument, result)| match result {
                Ok(bars) => self.compute(instrument, bars),
                Err(outcome) => outcome,
            })
            .collect();

        if is_cancelled(shutdown) {
            info!("Cancellation requested; stopping before gate evaluation");
            return (CycleStatus::Cancelled, None, outcomes);
        }

        self.enter(CyclePhase::Gating);
        let snapshots: Vec<InstrumentSnapshot> =
            outcomes.iter().filter_map(|o| o.snapshot.clone()).collect();
        let gate = match GateDecision::evaluate(&snapshots, &self.params, date) {
            Ok(gate) => gate,
            Err(e) => {
                warn!(error = %e, "No volatility reading for the basket; skipping gates");
                return (CycleStatus::NoData, None, outcomes);
            }
        };

        if !submit {
            return (CycleStatus::Completed, Some(gate), outcomes);
        }
        if let Some(reason) = gate.closed_reason() {
            info!(reason, "Gates closed; no orders this cycle");
            return (CycleStatus::Completed, Some(gate), outcomes);
        }

        self.enter(CyclePhase::Submitting);
        let resolver = ContractResolver::as_of(date);
        let outcomes: Vec<InstrumentOutcome> = stream::iter(outcomes)
            .map(move |outcome| self.submit(session, outcome, date, resolver, shutdown))
            .buffered(self.settings.max_concurrency)
            .collect()
            .await;

        let status = if outcomes.iter().any(|o| o.status == OutcomeStatus::Cancelled) {
            CycleStatus::Cancelled
        } else {
            CycleStatus::Completed
        };
        (status, Some(gate), outcomes)
    }

    async fn fetch(
        &self,
        session: &Mutex<Session>,
        instrument: &InstrumentDescriptor,
        date: NaiveDate,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Result<Vec<Bar>, InstrumentOutcome> {
        if is_cancelled(shutdown) {
            return Err(InstrumentOutcome::cancelled(instrument.clone()));
        }

        let result = {
            let session = session.lock().await;
            self.call(
                self.data.fetch_daily_bars(
                    &session,
                    instrument,
                    self.params.lookback,
                    self.params.bar_size,
                ),
                DataFetchError::Timeout,
            )
            .await
        };

        match result {
            Ok(mut bars) => {
                // Bars after the cycle date must not leak into its signals.
                let returned = bars.len();
                bars.retain(|bar| bar.date <= date);
                if bars.len() < returned {
                    debug!(
                        symbol = %instrument.symbol,
                        dropped = returned - bars.len(),
                        %date,
                        "Dropped bars dated after the cycle"
                    );
                }
                if bars.is_empty() {
                    warn!(symbol = %instrument.symbol, returned, "No bars on or before the cycle date");
                    return Err(InstrumentOutcome::failed(
                        instrument.clone(),
                        OutcomeStatus::FetchFailed,
                        format!("no bars on or before {}", date),
                    ));
                }
                debug!(symbol = %instrument.symbol, bars = bars.len(), "Fetched bars");
                Ok(bars)
            }
            Err(e) => {
                warn!(symbol = %instrument.symbol, error = %e, "Bar fetch failed");
                Err(InstrumentOutcome::failed(
                    instrument.clone(),
                    OutcomeStatus::FetchFailed,
                    e.to_string(),
                ))
            }
        }
    }

    fn compute(&self, instrument: &InstrumentDescriptor, bars: Vec<Bar>) -> InstrumentOutcome {
        let series = match PriceSeries::new(instrument.symbol.clone(), bars) {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %instrument.symbol, error = %e, "Malformed price series");
                return InstrumentOutcome::failed(
                    instrument.clone(),
                    OutcomeStatus::MalformedSeries,
                    e.to_string(),
                );
            }
        };

        match self.indicators.snapshot(instrument, &series) {
            Some(snapshot) => {
                debug!(
                    symbol = %instrument.symbol,
                    date = %snapshot.latest.date,
                    signal = %snapshot.signal(),
                    volatility = snapshot.volatility(),
                    "Computed snapshot"
                );
                InstrumentOutcome::computed(snapshot)
            }
            None => {
                let bars = series.len();
                let needed = self.indicators.first_defined_index() + 1;
                warn!(symbol = %instrument.symbol, bars, needed, "Insufficient history");
                InstrumentOutcome::failed(
                    instrument.clone(),
                    OutcomeStatus::InsufficientHistory { bars },
                    format!("{} bars, need at least {}", bars, needed),
                )
            }
        }
    }

    async fn submit(
        &self,
        session: &Mutex<Session>,
        mut outcome: InstrumentOutcome,
        date: NaiveDate,
        resolver: ContractResolver,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> InstrumentOutcome {
        let Some(snapshot) = outcome.snapshot.clone() else {
            return outcome;
        };
        if is_cancelled(shutdown) {
            return outcome.advance(
                OutcomeStatus::Cancelled,
                Some("cancellation requested".to_string()),
            );
        }

        let listed = {
            let session = session.lock().await;
            self.call(
                self.data
                    .fetch_available_contracts(&session, &snapshot.instrument),
                MetadataFetchError::Timeout,
            )
            .await
        };
        let listed = match listed {
            Ok(listed) => listed,
            Err(e) => {
                warn!(symbol = %snapshot.symbol(), error = %e, "Contract metadata fetch failed");
                return outcome.advance(OutcomeStatus::ResolutionFailed, Some(e.to_string()));
            }
        };

        let contract = match resolver.resolve(&snapshot.instrument, &listed) {
            Ok(contract) => contract,
            Err(e) => {
                warn!(symbol = %snapshot.symbol(), error = %e, "Contract resolution failed");
                return outcome.advance(OutcomeStatus::ResolutionFailed, Some(e.to_string()));
            }
        };

        let intent = OrderIntent::new(&snapshot, contract, self.params.order_quantity, date);
        outcome.intent = Some(intent.clone());

        if self.settings.dry_run {
            info!(
                symbol = %intent.symbol,
                side = %intent.side,
                quantity = intent.quantity,
                contract = %intent.contract,
                client_order_id = %intent.client_order_id,
                "Dry run; order not sent"
            );
            return outcome.advance(OutcomeStatus::DryRun, None);
        }

        let ack = {
            let session = session.lock().await;
            self.call(
                self.gateway.submit(&session, &intent.contract, &intent),
                SubmissionError::Timeout,
            )
            .await
        };

        match ack {
            Ok(ack) => {
                info!(
                    symbol = %intent.symbol,
                    side = %intent.side,
                    quantity = intent.quantity,
                    contract = %intent.contract,
                    order_id = %ack.order_id,
                    status = ?ack.status,
                    "Order submitted"
                );
                outcome.ack = Some(ack);
                outcome.advance(OutcomeStatus::Submitted, None)
            }
            Err(e) => {
                warn!(symbol = %intent.symbol, error = %e, "Order submission failed");
                outcome.advance(OutcomeStatus::SubmissionFailed, Some(e.to_string()))
            }
        }
    }

    /// Await one external request, bounded by the configured timeout.
    async fn call<T, E>(
        &self,
        request: impl Future<Output = Result<T, E>>,
        timed_out: E,
    ) -> Result<T, E> {
        match self.settings.request_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or_else(|_| Err(timed_out)),
            None => request.await,
        }
    }

    fn enter(&self, phase: CyclePhase) {
        debug!(phase = ?phase, "Entering phase");
        self.phase.send_replace(phase);
    }
}

fn is_cancelled(shutdown: Option<&watch::Receiver<bool>>) -> bool {
    shutdown.is_some_and(|rx| *rx.borrow())
}
