//! Core library for the `weather` screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its weatherapi.com client
//! - Shared domain models (locations, snapshots)
//! - The screen controller, its view model and the runtime that executes its requests
//!
//! It is used by `weather-tui`, but has no terminal dependencies of its own.

pub mod assets;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod provider;
pub mod runtime;
pub mod screen;
pub mod sequence;
pub mod view;

pub use assets::WeatherAsset;
pub use config::Config;
pub use error::ApiError;
pub use model::{Location, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use runtime::ScreenRuntime;
pub use screen::{Action, Effect, Phase, ScreenController, ScreenSettings, ScreenState};
pub use view::ScreenView;
