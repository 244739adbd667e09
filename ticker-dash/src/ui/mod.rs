//! Ratatui rendering of the dashboard: status bar, price chart, RSI chart and data table.

use crate::app::{App, InputMode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Candlesticks with EMA and Bollinger overlays.
pub mod price;

/// RSI oscillator with threshold bands.
pub mod rsi;

/// Title and state line.
pub mod status;

/// Latest price and tail-of-table panel.
pub mod table;

pub(crate) const C_BUY: Color = Color::Rgb(100, 220, 100);
pub(crate) const C_SELL: Color = Color::Rgb(220, 100, 100);
pub(crate) const C_NEUTRAL: Color = Color::Rgb(180, 180, 100);
pub(crate) const C_DIM: Color = Color::Rgb(120, 120, 120);
pub(crate) const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
pub(crate) const C_ACCENT: Color = Color::Rgb(100, 180, 220);
pub(crate) const C_BAND: Color = Color::Rgb(60, 60, 90);

const HELP: &str = " / ticker  +/- speed  r refresh  ←/→ pan  [/] zoom  0 reset  q quit";

pub fn draw(f: &mut Frame, app: &mut App) {
    let table_height = table_height(app.table_rows());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(60),
            Constraint::Percentage(40),
            Constraint::Length(table_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    let controller = app.controller();
    let ticker_field = match app.input() {
        InputMode::Ticker(buffer) => status::TickerField::Editing(buffer.as_str()),
        InputMode::Normal => status::TickerField::Current(controller.ticker()),
    };
    status::render_status(
        f,
        chunks[0],
        &status::StatusLine {
            date: controller.today(),
            ticker: ticker_field,
            speed: app.speed(),
            phase: controller.phase(),
            error: controller.last_error(),
        },
    );

    let store = controller.renderer();
    let fit = price::render_price_chart(f, chunks[1], store.charts(), store.viewport());
    rsi::render_rsi_chart(f, chunks[2], store.charts(), store.viewport(), fit);
    table::render_table(
        f,
        chunks[3],
        controller.latest_price(),
        controller.table().tail(app.table_rows()),
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(HELP, Style::default().fg(C_DIM)))),
        chunks[4],
    );

    app.set_chart_fit(fit);
}

/// Rows of the data panel: borders, price line and header around `rows` table rows.
fn table_height(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(4)
}

/// `"--"` for undefined values.
pub(crate) fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |value| format!("{value:.2}"))
}
