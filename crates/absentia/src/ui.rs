//! Terminal dashboard: event loop and drawing.
//!
//! One logical thread of control: input, the load completion, and the tick
//! interleave only at the loop's suspension points. Drawing is
//! immediate-mode, so every frame fully replaces the previous chart, table,
//! and result list; there is no retained widget state to go stale.

use std::io::{stdout, Stdout};
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::crossterm::{cursor, execute};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Dataset as ChartDataset, GraphType, List, ListItem, ListState,
    Paragraph, Row, Table, Wrap,
};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::{App, Msg, Phase};
use crate::config::Config;
use crate::dataset::{Dataset, DistrictRecord};
use crate::error::Result;
use crate::history::{RateHistory, SERIES_LABEL};
use crate::search::{MIN_QUERY_LEN, NO_MATCH_PLACEHOLDER};

/// Outcome of the startup load, delivered over the load channel.
pub type LoadOutcome = std::result::Result<Dataset, crate::error::Error>;

/// Maximum visible rows in the results panel before it scrolls.
const RESULTS_PANEL_ROWS: u16 = 8;

/// Loading indicator text shown until the load completes.
const LOADING_TEXT: &str = "Loading district data...";

/// Key hints shown in the search box title.
const KEY_HINTS: &str = "type to search, Enter select, Esc dismiss/quit, Ctrl-C quit";

/// Run the dashboard until the user quits.
///
/// `rx` delivers the result of the startup load exactly once; the loop
/// drains it without blocking so the UI stays interactive while the load
/// is in flight.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to.
pub async fn run(config: &Config, mut rx: mpsc::Receiver<LoadOutcome>) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config.tick(), &mut rx).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    let mut out = stdout();
    execute!(out, LeaveAlternateScreen, cursor::Show)?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    tick: Duration,
    rx: &mut mpsc::Receiver<LoadOutcome>,
) -> Result<()> {
    let mut app = App::new();
    let mut load_pending = true;

    loop {
        terminal.draw(|frame| draw(frame, &app))?;

        // Drain all pending input without blocking the loop
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(msg) = map_key(&key, &app) {
                    app.update(msg);
                }
            }
        }
        if app.should_quit() {
            break;
        }

        tokio::select! {
            outcome = rx.recv(), if load_pending => {
                load_pending = false;
                if let Some(result) = outcome {
                    debug!("dataset load completed: ok={}", result.is_ok());
                    app.update(Msg::DataLoaded(result));
                }
            }
            () = tokio::time::sleep(tick) => {}
        }
    }

    Ok(())
}

/// Translate a key event into a dispatchable message.
fn map_key(key: &KeyEvent, app: &App) -> Option<Msg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'q') => Some(Msg::Quit),
            _ => None,
        };
    }
    match key.code {
        // Esc is the "interaction outside the search widget": it dismisses
        // the results panel, and quits once the panel is already closed.
        KeyCode::Esc => {
            if app.results_open() {
                Some(Msg::Dismiss)
            } else {
                Some(Msg::Quit)
            }
        }
        KeyCode::Enter => Some(Msg::Select),
        KeyCode::Up => Some(Msg::MoveUp),
        KeyCode::Down => Some(Msg::MoveDown),
        KeyCode::Backspace => Some(Msg::QueryBackspace),
        KeyCode::Char(c) if !c.is_control() => Some(Msg::QueryChar(c)),
        _ => None,
    }
}

/// Height of the results panel for a given match count (borders included).
fn results_panel_height(match_count: usize) -> u16 {
    // At least one row for the no-match placeholder
    let rows = u16::try_from(match_count.max(1)).unwrap_or(u16::MAX);
    rows.min(RESULTS_PANEL_ROWS) + 2
}

fn draw(frame: &mut Frame, app: &App) {
    let matches = app.matches();
    let results_height = if app.results_open() {
        results_panel_height(matches.len())
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(results_height),
            Constraint::Min(0),
        ])
        .split(frame.area());

    draw_search_box(frame, app, chunks[0]);
    if app.results_open() {
        draw_results(frame, app, &matches, chunks[1]);
    }
    draw_main(frame, app, chunks[2]);
}

fn draw_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.query()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Search districts ({KEY_HINTS})")),
    );
    frame.render_widget(input, area);
}

fn draw_results(frame: &mut Frame, app: &App, matches: &[&DistrictRecord], area: Rect) {
    let items: Vec<ListItem> = if matches.is_empty() {
        vec![ListItem::new(NO_MATCH_PLACEHOLDER)]
    } else {
        matches
            .iter()
            .map(|record| ListItem::new(record.name.as_str()))
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Results"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));

    let mut state = ListState::default();
    // The placeholder row is not selectable
    if !matches.is_empty() {
        state.select(Some(app.selected()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_main(frame: &mut Frame, app: &App, area: Rect) {
    match app.phase() {
        Phase::Loading => {
            let loading =
                Paragraph::new(LOADING_TEXT).block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, area);
        }
        Phase::Failed(message) => {
            // Persistent: the indicator shows the error instead of hiding
            let error = Paragraph::new(format!("Error loading data: {message}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(error, area);
        }
        Phase::Ready(_) => {
            if let Some(history) = app.detail() {
                draw_detail(frame, history, area);
            } else {
                let hint = Paragraph::new(format!(
                    "Type at least {MIN_QUERY_LEN} characters to search for a district."
                ))
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(hint, area);
            }
        }
    }
}

fn draw_detail(frame: &mut Frame, history: &RateHistory, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(60),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(history.district.as_str())
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, chunks[0]);

    draw_chart(frame, history, chunks[1]);
    draw_table(frame, history, chunks[2]);
}

#[allow(clippy::cast_precision_loss)]
fn draw_chart(frame: &mut Frame, history: &RateHistory, area: Rect) {
    let segments = history.segments();
    // One unnamed dataset per contiguous run keeps gaps visible and the
    // legend hidden
    let datasets: Vec<ChartDataset> = segments
        .iter()
        .map(|segment| {
            ChartDataset::default()
                .graph_type(GraphType::Line)
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::Cyan))
                .data(segment)
        })
        .collect();

    let x_max = history.chart_labels.len().saturating_sub(1) as f64;
    let x_labels: Vec<Span> = history
        .chart_labels
        .iter()
        .map(|label| Span::from(*label))
        .collect();

    let y_max = history.max_rate().max(1.0);
    let y_labels = vec![
        Span::from("0%"),
        Span::from(format!("{:.1}%", y_max / 2.0)),
        Span::from(format!("{y_max:.1}%")),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(SERIES_LABEL))
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(
            Axis::default()
                .title("Percent Absent")
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn draw_table(frame: &mut Frame, history: &RateHistory, area: Rect) {
    let rows: Vec<Row> = history
        .rows
        .iter()
        .map(|row| Row::new(vec![Line::from(row.period), Line::from(row.value.clone())]))
        .collect();
    let widths = [Constraint::Percentage(50), Constraint::Percentage(50)];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![Line::from("School Year"), Line::from("Rate")])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("History"));
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::dataset::Dataset;

    const SAMPLE: &str = "\
clean_name,20242025,20232024,20222023,20212022,20202021,20192020
Lakeview USD,12.5,14.1,15.0,18.2,NA,NA
";

    fn ready_app_with_results() -> App {
        let mut app = App::new();
        app.update(Msg::DataLoaded(Ok(Dataset::parse(SAMPLE).unwrap())));
        app.update(Msg::QueryChar('l'));
        app.update(Msg::QueryChar('a'));
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_map_key_chars_edit_query() {
        let app = App::new();
        assert!(matches!(
            map_key(&key(KeyCode::Char('x')), &app),
            Some(Msg::QueryChar('x'))
        ));
        assert!(matches!(
            map_key(&key(KeyCode::Backspace), &app),
            Some(Msg::QueryBackspace)
        ));
    }

    #[test]
    fn test_map_key_navigation() {
        let app = App::new();
        assert!(matches!(map_key(&key(KeyCode::Up), &app), Some(Msg::MoveUp)));
        assert!(matches!(
            map_key(&key(KeyCode::Down), &app),
            Some(Msg::MoveDown)
        ));
        assert!(matches!(
            map_key(&key(KeyCode::Enter), &app),
            Some(Msg::Select)
        ));
    }

    #[test]
    fn test_map_key_esc_dismisses_when_panel_open() {
        let app = ready_app_with_results();
        assert!(app.results_open());
        assert!(matches!(
            map_key(&key(KeyCode::Esc), &app),
            Some(Msg::Dismiss)
        ));
    }

    #[test]
    fn test_map_key_esc_quits_when_panel_closed() {
        let app = App::new();
        assert!(matches!(map_key(&key(KeyCode::Esc), &app), Some(Msg::Quit)));
    }

    #[test]
    fn test_map_key_ctrl_c_quits() {
        let app = ready_app_with_results();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(map_key(&event, &app), Some(Msg::Quit)));
    }

    #[test]
    fn test_map_key_ignores_unbound_keys() {
        let app = App::new();
        assert!(map_key(&key(KeyCode::F(1)), &app).is_none());
        assert!(map_key(&key(KeyCode::Tab), &app).is_none());
    }

    #[test]
    fn test_results_panel_height() {
        // Placeholder row when nothing matched
        assert_eq!(results_panel_height(0), 3);
        assert_eq!(results_panel_height(1), 3);
        assert_eq!(results_panel_height(5), 7);
        // Capped
        assert_eq!(results_panel_height(100), RESULTS_PANEL_ROWS + 2);
    }
}
