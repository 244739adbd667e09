use super::{C_BAND, C_BRIGHT, C_DIM, C_NEUTRAL, price::draw_trace};
use crate::{chart::ChartSet, render::Viewport};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders,
        canvas::{Canvas, Line as Segment},
    },
};

/// Horizontal strokes per band used to shade it.
const BAND_STROKES: usize = 6;

/// Draw the RSI oscillator over the same bars as the price chart.
pub fn render_rsi_chart(
    f: &mut Frame,
    area: Rect,
    charts: Option<&ChartSet>,
    viewport: Viewport,
    fit: usize,
) {
    let latest = charts.and_then(|charts| charts.rsi.line.y.last().copied().flatten());
    let title = Line::from(vec![
        Span::styled(" RSI ", Style::default().fg(C_BRIGHT)),
        Span::styled(
            latest.map_or_else(String::new, |rsi| format!("{rsi:.1} ")),
            Style::default().fg(C_NEUTRAL),
        ),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    let Some(charts) = charts else {
        f.render_widget(block, area);
        return;
    };

    let rsi = &charts.rsi;
    let range = viewport.window(charts.len(), fit);
    let width = range.len() as f64;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width.max(1.0)])
        .y_bounds([rsi.y_range.0, rsi.y_range.1])
        .paint(|ctx| {
            for band in &rsi.bands {
                let step = (band.to - band.from) / BAND_STROKES as f64;
                for stroke in 0..=BAND_STROKES {
                    let y = band.from + step * stroke as f64;
                    ctx.draw(&Segment::new(0.0, y, width, y, C_BAND));
                }
            }
            ctx.layer();
            draw_trace(ctx, &rsi.line, range.clone(), C_NEUTRAL);
        });
    f.render_widget(canvas, area);
}
