// Echogram session - owns the selection and turns UI events into echogram requests
use crate::application::acoustic_repository::{AcousticRepository, EchogramContent, FetchError};
use crate::application::collaborators::EchogramPresenter;
use crate::application::dispatcher::{DebounceChannel, DebouncedDispatcher};
use crate::application::trajectory_service::AcousticDataset;
use crate::domain::query::{EchogramQuery, QueryError};
use crate::domain::selection::{SelectionState, StateChange};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Inputs from the UI controls and map clicks.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SelectPoint(i64),
    SetChannel(i64),
    SetVmin(f64),
    SetVmax(f64),
    SetTimeRange { start: Option<String>, end: Option<String> },
    ClearTimeRange,
    Generate,
    ShowInfo,
    Quit,
}

#[derive(Debug)]
pub enum SessionEvent {
    Control(ControlEvent),
    /// Rebuild the query from current state. `explicit` refreshes report a
    /// missing selection instead of skipping quietly.
    Refresh { explicit: bool },
    EchogramLoaded {
        generation: u64,
        query: EchogramQuery,
        result: Result<EchogramContent, FetchError>,
    },
}

pub struct EchogramSession {
    dataset: AcousticDataset,
    state: SelectionState,
    dispatcher: DebouncedDispatcher,
    repository: Arc<dyn AcousticRepository>,
    presenter: Box<dyn EchogramPresenter>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    generation: u64,
    // set while an immediate refresh sits in the event queue; true if any
    // of the changes it covers was an explicit request
    queued_refresh: Option<bool>,
}

impl EchogramSession {
    pub fn new(
        dataset: AcousticDataset,
        state: SelectionState,
        dispatcher: DebouncedDispatcher,
        repository: Arc<dyn AcousticRepository>,
        presenter: Box<dyn EchogramPresenter>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            dataset,
            state,
            dispatcher,
            repository,
            presenter,
            events_tx,
            events_rx,
            generation: 0,
            queued_refresh: None,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events_tx.clone()
    }

    /// Process events until `Quit`. Pending timers are cancelled on the way out.
    pub async fn run(mut self) -> SelectionState {
        tracing::info!("Echogram session started");
        while let Some(event) = self.events_rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        if self.dispatcher.is_pending(DebounceChannel::RenderParams) {
            tracing::debug!("Dropping pending echogram refresh");
        }
        self.dispatcher.shutdown();
        tracing::info!("Echogram session finished");
        self.state
    }

    fn handle(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Control(control) => return self.handle_control(control),
            SessionEvent::Refresh { explicit } => {
                let explicit = explicit || self.queued_refresh.take().unwrap_or(false);
                self.refresh(explicit)
            }
            SessionEvent::EchogramLoaded {
                generation,
                query,
                result,
            } => self.complete(generation, query, result),
        }
        true
    }

    fn handle_control(&mut self, control: ControlEvent) -> bool {
        tracing::debug!("Control event: {:?}", control);
        match control {
            ControlEvent::SelectPoint(index) => {
                let known = usize::try_from(index)
                    .map(|i| self.dataset.trajectory.point(i).is_some())
                    .unwrap_or(true);
                if !known {
                    self.presenter
                        .show_error(&format!("No trajectory point with index {}", index));
                    return true;
                }
                let change = self.state.select_point(index);
                self.react(change);
            }
            ControlEvent::SetChannel(channel) => {
                if channel < 0 {
                    self.presenter.show_error(&QueryError::InvalidChannel(channel).to_string());
                    return true;
                }
                if !self.dataset.is_known_channel(channel) {
                    self.presenter.show_error(&format!(
                        "Unknown channel {} ({} available)",
                        channel,
                        self.dataset.channels.len()
                    ));
                    return true;
                }
                let change = self.state.set_channel(channel);
                self.react(change);
            }
            ControlEvent::SetVmin(vmin) => {
                let change = self.state.set_color_range(vmin, self.state.vmax());
                self.react(change);
            }
            ControlEvent::SetVmax(vmax) => {
                let change = self.state.set_color_range(self.state.vmin(), vmax);
                self.react(change);
            }
            ControlEvent::SetTimeRange { start, end } => {
                let change = self.state.set_time_range(start.as_deref(), end.as_deref());
                self.react(change);
            }
            ControlEvent::ClearTimeRange => {
                let change = self.state.clear_time_range();
                self.react(change);
            }
            ControlEvent::Generate => self.trigger_now(true),
            ControlEvent::ShowInfo => {
                let summary = self.dataset.summary();
                self.presenter.show_message(&summary.to_string());
            }
            ControlEvent::Quit => return false,
        }
        true
    }

    fn react(&mut self, change: StateChange) {
        // anything in flight was requested for the previous selection
        self.generation += 1;
        match change {
            StateChange::PointSelected => {
                self.presenter.clear();
                let selected = usize::try_from(self.state.current_point_index())
                    .ok()
                    .and_then(|i| self.dataset.trajectory.point(i));
                match selected {
                    Some(point) => {
                        self.presenter.show_point(point);
                        self.trigger_now(false);
                    }
                    None => {
                        if self.dispatcher.cancel(DebounceChannel::RenderParams) {
                            tracing::debug!("Selection cleared, dropped pending refresh");
                        }
                    }
                }
            }
            StateChange::ChannelChanged | StateChange::TimeRangeChanged => self.trigger_now(false),
            StateChange::ColorRangeChanged => {
                if self.queued_refresh.is_some() {
                    tracing::trace!("Color scale change covered by queued refresh");
                    return;
                }
                let tx = self.events_tx.clone();
                self.dispatcher.schedule(DebounceChannel::RenderParams, move || {
                    let _ = tx.send(SessionEvent::Refresh { explicit: false });
                });
            }
        }
    }

    /// Queue a refresh ahead of any debounced one. Changes made before the
    /// queued refresh is processed share its single request.
    fn trigger_now(&mut self, explicit: bool) {
        if let Some(queued) = self.queued_refresh.as_mut() {
            *queued |= explicit;
            self.dispatcher.cancel(DebounceChannel::RenderParams);
            return;
        }
        let tx = self.events_tx.clone();
        self.dispatcher.dispatch_immediate(DebounceChannel::RenderParams, move || {
            let _ = tx.send(SessionEvent::Refresh { explicit });
        });
        self.queued_refresh = Some(explicit);
    }

    fn refresh(&mut self, explicit: bool) {
        match EchogramQuery::build(&self.state) {
            Ok(query) => self.dispatch(query),
            Err(QueryError::NoSelection) if !explicit => {
                tracing::debug!("No point selected, skipping echogram refresh");
            }
            Err(e) => {
                tracing::warn!("Cannot build echogram query: {}", e);
                self.presenter.show_error(&e.to_string());
            }
        }
    }

    fn dispatch(&mut self, query: EchogramQuery) {
        self.generation += 1;
        let generation = self.generation;
        tracing::info!(
            "Requesting echogram #{} for point {} on channel {}",
            generation,
            query.point_index,
            query.channel_index
        );
        self.presenter.show_loading(&query);

        let repository = self.repository.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = repository.fetch_echogram(&query).await;
            let _ = tx.send(SessionEvent::EchogramLoaded {
                generation,
                query,
                result,
            });
        });
    }

    fn complete(&mut self, generation: u64, query: EchogramQuery, result: Result<EchogramContent, FetchError>) {
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale echogram #{} (latest is #{})",
                generation,
                self.generation
            );
            return;
        }

        match result {
            Ok(content) => {
                if let Err(e) = self.presenter.show_echogram(&query, &content) {
                    tracing::warn!("Failed to display echogram: {:#}", e);
                    self.presenter.show_error(&format!("Failed to display echogram: {}", e));
                }
            }
            Err(e) => {
                tracing::warn!("Echogram request failed: {}", e);
                self.presenter.show_error(&format!("Failed to load echogram: {}", e));
            }
        }
    }
}
