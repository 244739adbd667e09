use super::{C_ACCENT, C_BRIGHT, C_BUY, C_DIM, C_SELL, fmt_opt};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};
use ticker_data::SeriesRow;

const HEADER: [&str; 10] = [
    "Time", "Open", "High", "Low", "Close", "Volume", "EMA10", "RSI", "BB High", "BB Low",
];

/// "Latest Price" line followed by the last merged rows.
pub fn render_table(f: &mut Frame, area: Rect, latest: Option<f64>, rows: &[SeriesRow]) {
    let block = Block::default()
        .title(" DATA ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let price = latest.map_or_else(|| "--".to_string(), |price| format!("{price:.2}"));
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Latest Price: ", Style::default().fg(C_DIM)),
            Span::styled(
                price,
                Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
            ),
        ])),
        chunks[0],
    );

    let header = Row::new(HEADER).style(Style::default().fg(C_ACCENT));
    let body = rows.iter().map(|row| {
        let color = if row.bar.is_bullish() { C_BUY } else { C_SELL };
        Row::new(vec![
            row.bar.time.format("%Y-%m-%d %H:%M").to_string(),
            format!("{:.2}", row.bar.open),
            format!("{:.2}", row.bar.high),
            format!("{:.2}", row.bar.low),
            format!("{:.2}", row.bar.close),
            format!("{:.0}", row.bar.volume),
            fmt_opt(row.ema),
            fmt_opt(row.rsi),
            fmt_opt(row.boll_high),
            fmt_opt(row.boll_low),
        ])
        .style(Style::default().fg(color))
    });

    let widths = [
        Constraint::Length(16),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(9),
    ];
    f.render_widget(Table::new(body, widths).header(header), chunks[1]);
}
