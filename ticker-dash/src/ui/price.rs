use super::{C_ACCENT, C_BRIGHT, C_BUY, C_DIM, C_NEUTRAL, C_SELL};
use crate::{
    chart::{ChartSet, LineTrace},
    render::Viewport,
};
use itertools::Itertools;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Context, Line as Segment, Rectangle},
    },
};
use std::ops::Range;

const C_EMA: Color = C_NEUTRAL;
const C_BOLLINGER: Color = C_ACCENT;

/// Half the width of a candle body, in bar slots.
const BODY_HALF_WIDTH: f64 = 0.3;

/// Draw the price chart and return how many bars fit across it.
pub fn render_price_chart(
    f: &mut Frame,
    area: Rect,
    charts: Option<&ChartSet>,
    viewport: Viewport,
) -> usize {
    let title = match charts {
        Some(charts) => Line::from(vec![
            Span::styled(format!(" {} ", charts.price.title), Style::default().fg(C_BRIGHT)),
            Span::styled(format!("{} ", charts.price.ema.name), Style::default().fg(C_EMA)),
            Span::styled(
                format!("{}/{} ", charts.price.boll_high.name, charts.price.boll_low.name),
                Style::default().fg(C_BOLLINGER),
            ),
        ]),
        None => Line::from(" Price Chart "),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    let fit = (block.inner(area).width as usize).max(1);

    let Some(charts) = charts.filter(|charts| !charts.is_empty()) else {
        let placeholder = Paragraph::new(Span::styled("Waiting for data...", Style::default().fg(C_DIM)))
            .block(block);
        f.render_widget(placeholder, area);
        return fit;
    };

    let range = viewport.window(charts.len(), fit);
    let Some((low, high)) = charts.price.bounds(range.clone()) else {
        f.render_widget(block, area);
        return fit;
    };
    let pad = ((high - low) * 0.02).max(0.01);

    let first = charts.price.x[range.start].date_naive();
    let last = charts.price.x[range.end - 1].date_naive();
    let block = block.title_bottom(Line::from(Span::styled(
        format!(" {first} → {last}  {:.2} - {:.2} ", low, high),
        Style::default().fg(C_DIM),
    )));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, range.len() as f64])
        .y_bounds([low - pad, high + pad])
        .paint(|ctx| {
            draw_candles(ctx, charts, range.clone());
            ctx.layer();
            draw_trace(ctx, &charts.price.boll_high, range.clone(), C_BOLLINGER);
            draw_trace(ctx, &charts.price.boll_low, range.clone(), C_BOLLINGER);
            draw_trace(ctx, &charts.price.ema, range.clone(), C_EMA);
        });
    f.render_widget(canvas, area);

    fit
}

fn draw_candles(ctx: &mut Context<'_>, charts: &ChartSet, range: Range<usize>) {
    let candles = &charts.price.candles;

    for (slot, index) in range.enumerate() {
        let (open, high, low, close) = (
            candles.open[index],
            candles.high[index],
            candles.low[index],
            candles.close[index],
        );
        let x = slot as f64 + 0.5;
        let color = if close >= open { C_BUY } else { C_SELL };

        ctx.draw(&Segment::new(x, low, x, high, color));
        ctx.draw(&Rectangle {
            x: x - BODY_HALF_WIDTH,
            y: open.min(close),
            width: 2.0 * BODY_HALF_WIDTH,
            height: (close - open).abs(),
            color,
        });
    }
}

/// Connect consecutive defined points; undefined values leave a gap.
pub(crate) fn draw_trace(ctx: &mut Context<'_>, trace: &LineTrace, range: Range<usize>, color: Color) {
    trace.y[range]
        .iter()
        .enumerate()
        .tuple_windows()
        .filter_map(|((i, a), (j, b))| Some((i, (*a)?, j, (*b)?)))
        .for_each(|(i, a, j, b)| {
            ctx.draw(&Segment::new(i as f64 + 0.5, a, j as f64 + 0.5, b, color));
        });
}
