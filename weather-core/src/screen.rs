//! State machine behind the weather screen.
//!
//! [`ScreenController::handle`] is the only way state changes. It takes an
//! [`Action`] (input, timer tick or provider completion) and returns the
//! [`Effect`]s the runtime must perform. It never performs I/O itself.

use std::time::{Duration, Instant};

use crate::{
    config::Config,
    debounce::Debouncer,
    error::ApiError,
    model::{Location, WeatherSnapshot},
    sequence::{RequestSlot, RequestTag},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Initial,
    /// A forecast request is outstanding and no snapshot was assigned for it.
    Loading,
    Ready,
    /// The latest forecast request failed; holds a user-facing message.
    Error(String),
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone)]
pub struct ScreenState {
    pub phase: Phase,
    pub search_visible: bool,
    pub query: String,
    pub candidates: Vec<Location>,
    /// Highlighted row in `candidates`.
    pub selected: usize,
    pub weather: Option<WeatherSnapshot>,
    /// First day shown in the day strip; never past the last full window.
    pub day_offset: usize,
    /// One-line status for the search box (no matches, search failed).
    pub search_notice: Option<String>,
}

impl ScreenState {
    fn new() -> Self {
        Self {
            phase: Phase::Initial,
            search_visible: false,
            query: String::new(),
            candidates: Vec::new(),
            selected: 0,
            weather: None,
            day_offset: 0,
            search_notice: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn results_visible(&self) -> bool {
        self.search_visible && !self.candidates.is_empty()
    }
}

#[derive(Debug)]
pub enum Action {
    Mount,
    ToggleSearch,
    QueryChanged { text: String, at: Instant },
    Tick(Instant),
    MoveSelection(isize),
    SelectCandidate(usize),
    SelectHighlighted,
    LocationsLoaded { tag: RequestTag, result: Result<Vec<Location>, ApiError> },
    ForecastLoaded { tag: RequestTag, result: Result<WeatherSnapshot, ApiError> },
    Retry,
    /// Move the day strip by `delta` cards when `visible` cards fit on screen.
    ScrollDays { delta: isize, visible: usize },
}

/// Work the controller asks the runtime to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SearchLocations { tag: RequestTag, query: String },
    FetchForecast { tag: RequestTag, city: String, days: u8 },
}

/// Behavioural knobs, usually taken from [`Config`].
#[derive(Debug, Clone)]
pub struct ScreenSettings {
    pub default_city: String,
    pub forecast_days: u8,
    pub min_query_len: usize,
    pub debounce: Duration,
}

impl From<&Config> for ScreenSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            default_city: cfg.default_city.clone(),
            forecast_days: cfg.forecast_days,
            min_query_len: cfg.min_query_len,
            debounce: cfg.search_debounce(),
        }
    }
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug)]
pub struct ScreenController {
    settings: ScreenSettings,
    state: ScreenState,
    debouncer: Debouncer<String>,
    search_slot: RequestSlot,
    forecast_slot: RequestSlot,
    last_city: Option<String>,
}

impl ScreenController {
    pub fn new(settings: ScreenSettings) -> Self {
        let debouncer = Debouncer::new(settings.debounce);
        Self {
            settings,
            state: ScreenState::new(),
            debouncer,
            search_slot: RequestSlot::default(),
            forecast_slot: RequestSlot::default(),
            last_city: None,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn settings(&self) -> &ScreenSettings {
        &self.settings
    }

    /// When the next [`Action::Tick`] can make progress, if ever.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mount => {
                if self.state.phase != Phase::Initial {
                    return Vec::new();
                }
                let city = self.settings.default_city.clone();
                vec![self.start_forecast(city)]
            }
            Action::ToggleSearch => {
                if matches!(self.state.phase, Phase::Initial | Phase::Loading) {
                    return Vec::new();
                }
                self.state.search_visible = !self.state.search_visible;
                // Stale results are dropped on open as well as on dismiss.
                self.reset_search();
                tracing::debug!(open = self.state.search_visible, "search toggled");
                Vec::new()
            }
            Action::QueryChanged { text, at } => {
                if !self.state.search_visible {
                    return Vec::new();
                }
                self.state.query = text.clone();
                self.debouncer.push(text, at);
                Vec::new()
            }
            Action::Tick(now) => self.on_tick(now),
            Action::MoveSelection(delta) => {
                let len = self.state.candidates.len();
                if len > 0 {
                    let next = self.state.selected as isize + delta;
                    self.state.selected = next.clamp(0, len as isize - 1) as usize;
                }
                Vec::new()
            }
            Action::SelectCandidate(index) => self.select(index),
            Action::SelectHighlighted => self.select(self.state.selected),
            Action::LocationsLoaded { tag, result } => {
                self.on_locations(tag, result);
                Vec::new()
            }
            Action::ForecastLoaded { tag, result } => {
                self.on_forecast(tag, result);
                Vec::new()
            }
            Action::Retry => {
                if !matches!(self.state.phase, Phase::Error(_)) {
                    return Vec::new();
                }
                match self.last_city.clone() {
                    Some(city) => vec![self.start_forecast(city)],
                    None => Vec::new(),
                }
            }
            Action::ScrollDays { delta, visible } => {
                let days = self.state.weather.as_ref().map_or(0, |w| w.forecast.forecastday.len());
                let last_start = days.saturating_sub(visible.max(1));
                let next = self.state.day_offset as isize + delta;
                self.state.day_offset = next.clamp(0, last_start as isize) as usize;
                Vec::new()
            }
        }
    }

    fn on_tick(&mut self, now: Instant) -> Vec<Effect> {
        let Some(query) = self.debouncer.poll(now) else {
            return Vec::new();
        };
        if !self.state.search_visible {
            return Vec::new();
        }
        if query.chars().count() < self.settings.min_query_len {
            tracing::trace!(%query, "query too short, not searching");
            return Vec::new();
        }

        let tag = self.search_slot.issue();
        tracing::info!(%query, %tag, "searching locations");
        vec![Effect::SearchLocations { tag, query }]
    }

    fn select(&mut self, index: usize) -> Vec<Effect> {
        let Some(location) = self.state.candidates.get(index).cloned() else {
            return Vec::new();
        };
        tracing::info!(location = %location.display_name(), "location selected");

        self.state.search_visible = false;
        self.reset_search();
        vec![self.start_forecast(location.name)]
    }

    fn reset_search(&mut self) {
        self.state.query.clear();
        self.state.candidates.clear();
        self.state.selected = 0;
        self.state.search_notice = None;
        self.debouncer.cancel();
        self.search_slot.invalidate();
    }

    fn start_forecast(&mut self, city: String) -> Effect {
        let tag = self.forecast_slot.issue();
        self.state.phase = Phase::Loading;
        self.last_city = Some(city.clone());
        tracing::info!(%city, %tag, "fetching forecast");
        Effect::FetchForecast { tag, city, days: self.settings.forecast_days }
    }

    fn on_locations(&mut self, tag: RequestTag, result: Result<Vec<Location>, ApiError>) {
        if !self.search_slot.is_latest(tag) || !self.state.search_visible {
            tracing::debug!(%tag, "dropping stale search response");
            return;
        }
        match result {
            Ok(locations) => {
                self.state.search_notice =
                    locations.is_empty().then(|| "No matching locations".to_string());
                self.state.candidates = locations;
                self.state.selected = 0;
            }
            Err(err) => {
                tracing::warn!(error = %err, "location search failed");
                self.state.search_notice = Some(err.user_message());
            }
        }
    }

    fn on_forecast(&mut self, tag: RequestTag, result: Result<WeatherSnapshot, ApiError>) {
        if !self.forecast_slot.is_latest(tag) {
            tracing::debug!(%tag, "dropping stale forecast response");
            return;
        }
        match result {
            Ok(snapshot) => {
                tracing::info!(location = %snapshot.location.display_name(), "forecast loaded");
                self.state.weather = Some(snapshot);
                self.state.day_offset = 0;
                self.state.phase = Phase::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "forecast fetch failed");
                self.state.phase = Phase::Error(err.user_message());
            }
        }
    }
}
