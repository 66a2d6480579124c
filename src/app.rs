//! Application state management for City Weather
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and state transitions between the city grid and the detail
//! view. Network work is never started from `handle_key`; keys queue a
//! `PendingAction` which the event loop runs between frames.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;

use cityweather::cache::Store;
use cityweather::config::Config;
use cityweather::data::city::quick_city;
use cityweather::data::{
    format_current, format_forecast, CurrentWeather, DailyForecast, RequestResult,
    WeatherApiClient,
};

/// Number of forecast days shown in the detail view, starting from tomorrow
pub const FORECAST_DAYS_SHOWN: usize = 4;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching the home grid
    Loading,
    /// Grid of popular cities
    CityList,
    /// Detail view for the named city
    CityDetail(String),
}

/// Whether keys go to navigation or to the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Work requested by a key press, run by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Reload the home grid
    LoadCities,
    /// Fetch and open the detail view for a city
    ShowDetail(String),
}

/// A loaded home grid card
#[derive(Debug, Clone)]
pub struct CityCard {
    /// The configured city name used for the request
    pub query: String,
    pub weather: CurrentWeather,
    pub from_cache: bool,
}

/// Data behind the detail view
#[derive(Debug, Clone)]
pub struct CityDetail {
    pub current: CurrentWeather,
    /// Every returned forecast day, today first
    pub forecast: Vec<DailyForecast>,
}

impl CityDetail {
    /// The forecast days displayed: tomorrow onward, at most four
    pub fn upcoming(&self) -> &[DailyForecast] {
        let start = self.forecast.len().min(1);
        let end = self.forecast.len().min(1 + FORECAST_DAYS_SHOWN);
        &self.forecast[start..end]
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Index of the selected card in the city grid
    pub selected_index: usize,
    /// Cities configured for the home grid
    pub cities: Vec<String>,
    /// Cards for cities that loaded successfully, in configured order
    pub cards: Vec<CityCard>,
    /// Data for the open detail view
    pub detail: Option<CityDetail>,
    /// Message shown in the status line (errors, load summaries)
    pub status: Option<String>,
    /// Where key presses go
    pub input_mode: InputMode,
    /// Text typed into the search box
    pub search_input: String,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// True while a pending action is running
    pub busy: bool,
    /// Timestamp of last grid refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Work queued by the last key press
    pending: Option<PendingAction>,
    /// City to open once the grid has loaded (from --city)
    initial_city: Option<String>,
    /// Flush the cache before the first load
    clear_on_start: bool,
    /// WeatherAPI client
    client: WeatherApiClient,
}

impl App {
    /// Creates a new App in the loading state
    pub fn new(config: &Config, store: Arc<dyn Store>, initial_city: Option<String>) -> Self {
        Self::with_client(config, WeatherApiClient::new(config, store), initial_city)
    }

    /// Creates a new App around an existing client
    pub fn with_client(
        config: &Config,
        client: WeatherApiClient,
        initial_city: Option<String>,
    ) -> Self {
        Self {
            state: AppState::Loading,
            selected_index: 0,
            cities: config.cities.clone(),
            cards: Vec::new(),
            detail: None,
            status: None,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            should_quit: false,
            show_help: false,
            busy: false,
            last_refresh: None,
            pending: None,
            initial_city,
            clear_on_start: config.cache.clear_on_start,
            client,
        }
    }

    /// Returns the currently selected card, if any
    pub fn selected_card(&self) -> Option<&CityCard> {
        self.cards.get(self.selected_index)
    }

    /// Takes the queued action, leaving none behind
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Runs the startup sequence: optional cache flush, grid load, initial city
    pub async fn load_initial(&mut self) {
        if self.clear_on_start {
            if let Err(e) = self.client.clear_cache() {
                tracing::warn!(error = %e, "failed to clear cache at startup");
            }
        }

        self.load_cities().await;

        if let Some(city) = self.initial_city.take() {
            self.show_detail(&city).await;
        }
    }

    /// Runs a queued action to completion
    pub async fn perform(&mut self, action: PendingAction) {
        self.busy = true;
        match action {
            PendingAction::LoadCities => self.load_cities().await,
            PendingAction::ShowDetail(city) => self.show_detail(&city).await,
        }
        self.busy = false;
    }

    /// Loads current conditions for every configured city concurrently
    ///
    /// Each city's request is independent; failures are counted and logged
    /// and the city is left off the grid.
    pub async fn load_cities(&mut self) {
        let futures = self.cities.iter().map(|city| self.client.current(city));
        let results: Vec<RequestResult> = futures::future::join_all(futures).await;

        let mut cards = Vec::with_capacity(results.len());
        let mut failed = 0;

        for (city, result) in self.cities.iter().zip(results) {
            match result {
                Ok(fetched) => {
                    let weather = format_current(&fetched.data);
                    tracing::info!(
                        city = %city,
                        temp = weather.temp,
                        condition = %weather.condition,
                        from_cache = fetched.from_cache,
                        "city loaded"
                    );
                    cards.push(CityCard {
                        query: city.clone(),
                        weather,
                        from_cache: fetched.from_cache,
                    });
                }
                Err(e) => {
                    tracing::warn!(city = %city, error = %e, "city failed to load");
                    failed += 1;
                }
            }
        }

        tracing::info!(
            loaded = cards.len(),
            total = self.cities.len(),
            failed,
            "city grid loaded"
        );

        self.status = if failed > 0 {
            Some(format!(
                "Loaded {}/{} cities, {} failed",
                cards.len(),
                self.cities.len(),
                failed
            ))
        } else {
            None
        };
        self.cards = cards;
        if self.selected_index >= self.cards.len() {
            self.selected_index = 0;
        }
        self.last_refresh = Some(Local::now());

        if self.state == AppState::Loading {
            self.state = AppState::CityList;
        }
    }

    /// Fetches current conditions and forecast for one city and opens its detail
    ///
    /// Both requests are issued together. A failed current-conditions request
    /// leaves the view unchanged and reports the error; a failed forecast
    /// still opens the detail with an empty forecast.
    pub async fn show_detail(&mut self, city: &str) {
        let (current, forecast) = futures::join!(
            self.client.current(city),
            self.client.forecast_default(city)
        );

        let current = match current {
            Ok(fetched) => format_current(&fetched.data),
            Err(e) => {
                self.status = Some(format!("{}: {}", city, e));
                if self.state == AppState::Loading {
                    self.state = AppState::CityList;
                }
                return;
            }
        };

        let forecast = match forecast {
            Ok(fetched) => {
                self.status = None;
                format_forecast(&fetched.data, self.client.lang())
            }
            Err(e) => {
                self.status = Some(format!("Forecast unavailable: {}", e));
                Vec::new()
            }
        };

        self.detail = Some(CityDetail { current, forecast });
        self.state = AppState::CityDetail(city.to_string());
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc` (in CityList): Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection in the grid
    /// - `Enter`: Open the selected city
    /// - `1`-`9`, `0`: Open a quick-pick city
    /// - `/`: Search for a city
    /// - `r`: Refresh the current view
    /// - `Esc` (in CityDetail): Go back to the grid
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key_event);
            return;
        }

        match &self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::CityList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if let Some(card) = self.selected_card() {
                        self.pending = Some(PendingAction::ShowDetail(card.query.clone()));
                    }
                }
                KeyCode::Char('r') => {
                    self.pending = Some(PendingAction::LoadCities);
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.queue_quick_city(c);
                }
                KeyCode::Char('/') => {
                    self.start_search();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::CityDetail(city) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.detail = None;
                    self.state = AppState::CityList;
                }
                KeyCode::Char('r') => {
                    self.pending = Some(PendingAction::ShowDetail(city.clone()));
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.queue_quick_city(c);
                }
                KeyCode::Char('/') => {
                    self.start_search();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
            }
            KeyCode::Enter => {
                let city = self.search_input.trim().to_string();
                if city.is_empty() {
                    self.status = Some("Please enter a city name".to_string());
                    return;
                }
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
                self.pending = Some(PendingAction::ShowDetail(city));
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
            }
            _ => {}
        }
    }

    fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_input.clear();
    }

    /// Queues the quick-pick city for digit `c` ('1' is the first, '0' the tenth)
    fn queue_quick_city(&mut self, c: char) {
        let Some(digit) = c.to_digit(10) else {
            return;
        };
        let index = if digit == 0 { 9 } else { digit as usize - 1 };
        if let Some(city) = quick_city(index) {
            self.pending = Some(PendingAction::ShowDetail(city.to_string()));
        }
    }

    /// Moves the selection up in the grid, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.cards.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the grid, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.cards.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }
}
