//! Display projection of [`ScreenState`].
//!
//! Building a view never fails: missing or odd fields degrade to placeholders.

use chrono::{Locale, NaiveDate};

use crate::{
    assets::WeatherAsset,
    screen::{Phase, ScreenState},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView {
    Loading,
    /// `search` is set while the search box is open, so a different city
    /// can be picked without a successful forecast.
    Error { message: String, search: Option<SearchView> },
    Ready(ReadyView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    /// "Name, Country".
    pub header: String,
    pub asset: WeatherAsset,
    pub temperature: String,
    pub condition: String,
    pub wind: String,
    pub humidity: String,
    pub sunrise: String,
    pub days: Vec<DayView>,
    pub day_offset: usize,
    pub search: Option<SearchView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub weekday: String,
    pub asset: WeatherAsset,
    pub avg_temp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub query: String,
    /// "Name, Country" for every candidate, in provider order.
    pub rows: Vec<String>,
    pub selected: usize,
    pub notice: Option<String>,
}

impl ScreenView {
    pub fn from_state(state: &ScreenState, locale: Locale) -> Self {
        let search = state.search_visible.then(|| SearchView {
            query: state.query.clone(),
            rows: state.candidates.iter().map(|l| l.display_name()).collect(),
            selected: state.selected,
            notice: state.search_notice.clone(),
        });

        match &state.phase {
            Phase::Initial | Phase::Loading => return ScreenView::Loading,
            Phase::Error(message) => {
                return ScreenView::Error { message: message.clone(), search };
            }
            Phase::Ready => {}
        }

        let Some(weather) = &state.weather else {
            return ScreenView::Loading;
        };
        let current = &weather.current;

        let days = weather
            .forecast
            .forecastday
            .iter()
            .map(|d| DayView {
                weekday: weekday_name(&d.date, locale),
                asset: WeatherAsset::for_condition(&d.day.condition.text),
                avg_temp: format!("{}°", trim_number(d.day.avgtemp_c)),
            })
            .collect();

        ScreenView::Ready(ReadyView {
            header: weather.location.display_name(),
            asset: WeatherAsset::for_condition(&current.condition.text),
            temperature: format!("{}°", trim_number(current.temp_c)),
            condition: current.condition.text.trim().to_string(),
            wind: format!("{}km", trim_number(current.wind_kph)),
            humidity: format!("{}%", current.humidity),
            sunrise: weather.first_sunrise().unwrap_or("--").to_string(),
            days,
            day_offset: state.day_offset,
            search,
        })
    }
}

/// Parse a locale name such as "en_US" or "de-DE", falling back to en_US.
pub fn parse_locale(name: &str) -> Locale {
    let normalized = name.replace('-', "_");
    Locale::try_from(normalized.as_str()).unwrap_or_else(|_| {
        tracing::warn!(locale = %name, "unknown locale, using en_US");
        Locale::en_US
    })
}

/// Abbreviated weekday for a `YYYY-MM-DD` date; the raw string if it doesn't parse.
pub fn weekday_name(date: &str, locale: Locale) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().format_localized("%a", locale).to_string())
        .unwrap_or_else(|| date.to_string())
}

/// Print numbers the way the provider sends them: `31` rather than `31.0`.
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.1}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
