//! Glue between the controller and async provider calls.
//!
//! Effects are executed on spawned tasks; each task reports back by sending
//! an [`Action`] on the completion channel. Only the owner of the
//! [`ScreenRuntime`] touches the controller, so state is never shared.

use std::{sync::Arc, time::Instant};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    provider::WeatherProvider,
    screen::{Action, Effect, ScreenController, ScreenSettings, ScreenState},
};

#[derive(Debug, Clone)]
pub struct EffectRunner {
    provider: Arc<dyn WeatherProvider>,
    completions: mpsc::UnboundedSender<Action>,
}

impl EffectRunner {
    pub fn new(provider: Arc<dyn WeatherProvider>, completions: mpsc::UnboundedSender<Action>) -> Self {
        Self { provider, completions }
    }

    pub fn run(&self, effect: Effect) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let tx = self.completions.clone();

        tokio::spawn(async move {
            let action = match effect {
                Effect::SearchLocations { tag, query } => {
                    let result = provider.fetch_locations(&query).await;
                    Action::LocationsLoaded { tag, result }
                }
                Effect::FetchForecast { tag, city, days } => {
                    let result = provider.fetch_forecast(&city, days).await;
                    Action::ForecastLoaded { tag, result }
                }
            };
            // Receiver gone means the screen was closed; nothing left to update.
            if tx.send(action).is_err() {
                tracing::debug!("screen closed before request completed");
            }
        })
    }
}

/// Controller plus the machinery to execute what it asks for.
#[derive(Debug)]
pub struct ScreenRuntime {
    controller: ScreenController,
    runner: EffectRunner,
    completions: mpsc::UnboundedReceiver<Action>,
}

impl ScreenRuntime {
    pub fn new(provider: Arc<dyn WeatherProvider>, settings: ScreenSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller: ScreenController::new(settings),
            runner: EffectRunner::new(provider, tx),
            completions: rx,
        }
    }

    pub fn state(&self) -> &ScreenState {
        self.controller.state()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    /// Apply an action and start whatever requests it produced.
    pub fn dispatch(&mut self, action: Action) {
        for effect in self.controller.handle(action) {
            self.runner.run(effect);
        }
    }

    /// Apply every completion that has already arrived, then advance timers.
    ///
    /// Returns true when anything was applied.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut applied = false;
        while let Ok(action) = self.completions.try_recv() {
            self.dispatch(action);
            applied = true;
        }
        if self.next_deadline().is_some_and(|at| now >= at) {
            self.dispatch(Action::Tick(now));
            applied = true;
        }
        applied
    }

    /// Wait for the next completion and apply it.
    pub async fn apply_next_completion(&mut self) -> bool {
        match self.completions.recv().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }
}
