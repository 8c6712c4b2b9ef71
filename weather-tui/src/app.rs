use std::{
    io::{self, Stdout},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::Locale;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use weather_core::{
    Action, Config, Phase, ScreenRuntime, ScreenSettings, ScreenState, ScreenView,
    WeatherProvider, provider_from_config, view::parse_locale,
};

use crate::render;

const POLL_INTERVAL: Duration = Duration::from_millis(33);

/// What a key press means in the current state.
#[derive(Debug)]
enum KeyOutcome {
    Quit,
    Dispatch(Action),
    Ignored,
}

pub async fn run(config: Config, city: Option<String>) -> Result<()> {
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

    let mut settings = ScreenSettings::from(&config);
    if let Some(city) = city {
        settings.default_city = city;
    }
    let locale = parse_locale(&config.locale);
    let mut runtime = ScreenRuntime::new(provider, settings);

    let mut terminal = setup_terminal().context("Failed to initialize terminal")?;
    let result = event_loop(&mut terminal, &mut runtime, locale).await;
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    runtime: &mut ScreenRuntime,
    locale: Locale,
) -> Result<()> {
    runtime.dispatch(Action::Mount);

    loop {
        runtime.pump(Instant::now());

        let view = ScreenView::from_state(runtime.state(), locale);
        terminal.draw(|f| render::draw(f, &view))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let day_cards = render::day_cards_for_screen(terminal.size()?.width);
                    match key_outcome(runtime.state(), key, Instant::now(), day_cards) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Dispatch(action) => runtime.dispatch(action),
                        KeyOutcome::Ignored => {}
                    }
                }
            }
        }

        // Let completion tasks make progress on a single-threaded runtime too.
        tokio::task::yield_now().await;
    }

    tracing::info!("screen closed");
    Ok(())
}

/// `day_cards` is how many forecast days currently fit in the strip.
fn key_outcome(state: &ScreenState, key: KeyEvent, now: Instant, day_cards: usize) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    if state.search_visible {
        let edited = |text: String| KeyOutcome::Dispatch(Action::QueryChanged { text, at: now });
        return match key.code {
            KeyCode::Esc => KeyOutcome::Dispatch(Action::ToggleSearch),
            KeyCode::Enter => KeyOutcome::Dispatch(Action::SelectHighlighted),
            KeyCode::Up => KeyOutcome::Dispatch(Action::MoveSelection(-1)),
            KeyCode::Down => KeyOutcome::Dispatch(Action::MoveSelection(1)),
            KeyCode::Backspace => {
                let mut text = state.query.clone();
                if text.pop().is_none() {
                    return KeyOutcome::Ignored;
                }
                edited(text)
            }
            KeyCode::Char(c) => edited(format!("{}{c}", state.query)),
            _ => KeyOutcome::Ignored,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyOutcome::Quit,
        KeyCode::Char('/') | KeyCode::Char('s') => KeyOutcome::Dispatch(Action::ToggleSearch),
        KeyCode::Char('r') if matches!(state.phase, Phase::Error(_)) => {
            KeyOutcome::Dispatch(Action::Retry)
        }
        KeyCode::Left => {
            KeyOutcome::Dispatch(Action::ScrollDays { delta: -1, visible: day_cards })
        }
        KeyCode::Right => {
            KeyOutcome::Dispatch(Action::ScrollDays { delta: 1, visible: day_cards })
        }
        _ => KeyOutcome::Ignored,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(term: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    term.show_cursor()?;
    Ok(())
}
