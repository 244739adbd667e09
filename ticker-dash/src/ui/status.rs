use super::{C_ACCENT, C_BRIGHT, C_BUY, C_DIM, C_NEUTRAL, C_SELL};
use crate::{controller::Phase, refresh::RefreshSpeed};
use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use ticker_data::DataError;

pub enum TickerField<'a> {
    Current(Option<&'a str>),
    Editing(&'a str),
}

pub struct StatusLine<'a> {
    pub date: NaiveDate,
    pub ticker: TickerField<'a>,
    pub speed: RefreshSpeed,
    pub phase: Phase,
    pub error: Option<&'a DataError>,
}

pub fn render_status(f: &mut Frame, area: Rect, status: &StatusLine<'_>) {
    let block = Block::default()
        .title(Span::styled(
            " Real Time Stock Price ",
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));

    let ticker = match status.ticker {
        TickerField::Editing(buffer) => Span::styled(
            format!("{buffer}_"),
            Style::default()
                .fg(C_NEUTRAL)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        TickerField::Current(Some(ticker)) => Span::styled(
            ticker.to_string(),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        TickerField::Current(None) => Span::styled("press / to enter", Style::default().fg(C_DIM)),
    };

    let phase_color = match status.phase {
        Phase::Idle => C_DIM,
        Phase::LoadingHistory | Phase::Refreshing => C_NEUTRAL,
        Phase::Ready => C_BUY,
    };

    let mut spans = vec![
        Span::styled(status.date.to_string(), Style::default().fg(C_BRIGHT)),
        Span::styled("  Ticker: ", Style::default().fg(C_DIM)),
        ticker,
        Span::styled("  Speed: ", Style::default().fg(C_DIM)),
        Span::styled(status.speed.to_string(), Style::default().fg(C_ACCENT)),
        Span::styled("  ", Style::default()),
        Span::styled(status.phase.to_string(), Style::default().fg(phase_color)),
    ];
    if let Some(error) = status.error {
        spans.push(Span::styled("  ", Style::default()));
        spans.push(Span::styled(error.to_string(), Style::default().fg(C_SELL)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
