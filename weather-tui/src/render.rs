use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use weather_core::view::{DayView, ReadyView, ScreenView, SearchView};

const DAY_CARD_WIDTH: u16 = 12;
const DAY_CARD_HEIGHT: u16 = 5;

pub fn draw(f: &mut Frame, view: &ScreenView) {
    let area = f.area();
    match view {
        ScreenView::Loading => render_loading(f, area),
        ScreenView::Error { message, search } => render_error(f, area, message, search.as_ref()),
        ScreenView::Ready(ready) => render_ready(f, area, ready),
    }
}

fn centered_line(area: Rect) -> Rect {
    let y = area.y + area.height / 2;
    Rect { x: area.x, y, width: area.width, height: 1.min(area.height) }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let p = Paragraph::new(Line::from(Span::styled(
        "Loading...",
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(p, centered_line(area));
}

fn render_error(f: &mut Frame, area: Rect, message: &str, search: Option<&SearchView>) {
    if let Some(search) = search {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(results_height(Some(search))),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        render_search_bar(f, rows[0], Some(search));
        render_search_results(f, rows[1], search);
        let p = Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(p, centered_line(rows[2]));
        render_footer(f, rows[3], true);
        return;
    }

    let lines = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" retry  "),
            Span::styled("/", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" search  "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]),
    ];
    let y = area.y + area.height.saturating_sub(3) / 2;
    let rect = Rect { x: area.x, y, width: area.width, height: 3.min(area.height) };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

/// Rows taken by the result list (or the notice) below the search bar.
fn results_height(search: Option<&SearchView>) -> u16 {
    match search {
        Some(search) if !search.rows.is_empty() => search.rows.len() as u16 + 2,
        Some(search) if search.notice.is_some() => 3,
        _ => 0,
    }
}

fn render_ready(f: &mut Frame, area: Rect, view: &ReadyView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(results_height(view.search.as_ref())),
            Constraint::Min(6),
            Constraint::Length(DAY_CARD_HEIGHT + 2),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(f, rows[0], view.search.as_ref());
    if let Some(search) = &view.search {
        render_search_results(f, rows[1], search);
    }
    render_current(f, rows[2], view);
    render_day_strip(f, rows[3], &view.days, view.day_offset);
    render_footer(f, rows[4], view.search.is_some());
}

fn render_search_bar(f: &mut Frame, area: Rect, search: Option<&SearchView>) {
    let (text, style) = match search {
        Some(s) if s.query.is_empty() => ("Search City".to_string(), Style::default().fg(Color::Gray)),
        Some(s) => (format!("{}▏", s.query), Style::default().fg(Color::White)),
        None => (String::new(), Style::default()),
    };
    let border = if search.is_some() { Color::White } else { Color::DarkGray };
    let p = Paragraph::new(Line::from(Span::styled(text, style))).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" 🔍 ")
            .title_alignment(Alignment::Right)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

fn render_search_results(f: &mut Frame, area: Rect, search: &SearchView) {
    if area.height == 0 {
        return;
    }
    let block = Block::default().borders(Borders::ALL);

    let lines: Vec<Line> = if search.rows.is_empty() {
        let notice = search.notice.clone().unwrap_or_default();
        vec![Line::from(Span::styled(notice, Style::default().fg(Color::Yellow)))]
    } else {
        search
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i == search.selected {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![Span::raw("📍 "), Span::styled(row.clone(), style)])
            })
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_current(f: &mut Frame, area: Rect, view: &ReadyView) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled(view.header.clone(), bold.fg(Color::White))),
        Line::from(""),
        Line::from(Span::raw(view.asset.glyph())),
        Line::from(Span::styled(view.temperature.clone(), bold)),
        Line::from(view.condition.clone()),
        Line::from(""),
        Line::from(vec![
            Span::raw("💨 "),
            Span::raw(view.wind.clone()),
            Span::raw("   💧 "),
            Span::raw(view.humidity.clone()),
            Span::raw("   🌅 "),
            Span::raw(view.sunrise.clone()),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        area,
    );
}

/// Number of day cards that fit side by side.
pub fn visible_day_cards(width: u16) -> usize {
    (width / DAY_CARD_WIDTH) as usize
}

/// Day cards shown on a terminal `width` columns wide (the strip is bordered).
pub fn day_cards_for_screen(width: u16) -> usize {
    visible_day_cards(width.saturating_sub(2))
}

fn render_day_strip(f: &mut Frame, area: Rect, days: &[DayView], offset: usize) {
    let block = Block::default().borders(Borders::ALL).title(" Daily forecast ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let fit = visible_day_cards(inner.width);
    if fit == 0 {
        return;
    }
    // The terminal may have grown since the last scroll.
    let start = offset.min(days.len().saturating_sub(fit));
    let shown = &days[start..days.len().min(start + fit)];

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(shown.iter().map(|_| Constraint::Length(DAY_CARD_WIDTH)))
        .split(inner);

    for (day, rect) in shown.iter().zip(cards.iter()) {
        let lines = vec![
            Line::from(day.asset.glyph()),
            Line::from(day.weekday.clone()),
            Line::from(Span::styled(
                day.avg_temp.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        let card = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
        f.render_widget(card, *rect);
    }
}

fn render_footer(f: &mut Frame, area: Rect, searching: bool) {
    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    let spans = if searching {
        vec![
            key("type"),
            Span::raw(" city  "),
            key("↑/↓"),
            Span::raw(" choose  "),
            key("enter"),
            Span::raw(" select  "),
            key("esc"),
            Span::raw(" close"),
        ]
    } else {
        vec![
            key("/"),
            Span::raw(" search  "),
            key("←/→"),
            Span::raw(" days  "),
            key("q"),
            Span::raw(" quit"),
        ]
    };
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Plain text rendition used by one-shot commands.
pub fn plain_lines(view: &ScreenView) -> Vec<String> {
    match view {
        ScreenView::Loading => vec!["Loading...".to_string()],
        ScreenView::Error { message, .. } => vec![format!("Error: {message}")],
        ScreenView::Ready(r) => {
            let mut out = vec![
                r.header.clone(),
                format!("{} {}  {}", r.asset.glyph(), r.temperature, r.condition),
                format!("wind {}  humidity {}  sunrise {}", r.wind, r.humidity, r.sunrise),
                String::new(),
            ];
            out.extend(
                r.days.iter().map(|d| format!("{:<6}{} {}", d.weekday, d.asset.glyph(), d.avg_temp)),
            );
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use weather_core::WeatherAsset;

    fn day(weekday: &str) -> DayView {
        DayView { weekday: weekday.into(), asset: WeatherAsset::Sun, avg_temp: "24°".into() }
    }

    fn ready_view(search: Option<SearchView>) -> ScreenView {
        ScreenView::Ready(ReadyView {
            header: "Jalna, India".into(),
            asset: WeatherAsset::PartlyCloudy,
            temperature: "31°".into(),
            condition: "Partly cloudy".into(),
            wind: "12km".into(),
            humidity: "40%".into(),
            sunrise: "06:52 AM".into(),
            days: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].iter().map(|d| day(d)).collect(),
            day_offset: 0,
            search,
        })
    }

    fn render_to_text(view: &ScreenView, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, view)).unwrap();

        let buf = terminal.backend().buffer();
        buf.content()
            .chunks(buf.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn loading_view_shows_only_loading_message() {
        let text = render_to_text(&ScreenView::Loading, 60, 20);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("Daily forecast"));
    }

    #[test]
    fn error_view_offers_retry() {
        let view = ScreenView::Error {
            message: "Network error. Check your connection.".into(),
            search: None,
        };
        let text = render_to_text(&view, 60, 20);
        assert!(text.contains("Network error"));
        assert!(text.contains("retry"));
    }

    #[test]
    fn error_view_with_open_search_draws_query_and_candidates() {
        let view = ScreenView::Error {
            message: "No forecast available for this location.".into(),
            search: Some(SearchView {
                query: "Paris".into(),
                rows: vec!["Paris, France".into()],
                selected: 0,
                notice: None,
            }),
        };
        let text = render_to_text(&view, 80, 24);

        assert!(text.contains("Paris▏"));
        assert!(text.contains("Paris, France"));
        assert!(text.contains("No forecast available"));
        assert!(text.contains("esc"));
    }

    #[test]
    fn ready_view_draws_header_details_and_all_days() {
        let text = render_to_text(&ready_view(None), 100, 30);

        assert!(text.contains("Jalna, India"));
        assert!(text.contains("Partly cloudy"));
        assert!(text.contains("06:52 AM"));
        let mut last = 0;
        for weekday in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
            let pos = text.find(weekday).unwrap_or_else(|| panic!("missing {weekday}"));
            assert!(pos >= last, "{weekday} out of order");
            last = pos;
        }
    }

    #[test]
    fn narrow_strip_shows_a_window_of_days() {
        assert_eq!(visible_day_cards(50), 4);
        assert_eq!(day_cards_for_screen(50), 4);
        assert_eq!(day_cards_for_screen(49), 3);
        let text = render_to_text(&ready_view(None), 50, 30);
        assert!(text.contains("Mon"));
        assert!(!text.contains("Sun"));
    }

    #[test]
    fn open_search_lists_candidates() {
        let search = SearchView {
            query: "Lon".into(),
            rows: vec!["London, United Kingdom".into(), "Londrina, Brazil".into()],
            selected: 0,
            notice: None,
        };
        let text = render_to_text(&ready_view(Some(search)), 80, 34);

        assert!(text.contains("London, United Kingdom"));
        assert!(text.contains("Londrina, Brazil"));
        assert!(text.contains("esc"));
    }

    #[test]
    fn plain_lines_has_one_line_per_day() {
        let lines = plain_lines(&ready_view(None));
        assert_eq!(lines[0], "Jalna, India");
        assert_eq!(lines.len(), 4 + 7);
        assert!(lines[4].starts_with("Mon"));
    }
}
