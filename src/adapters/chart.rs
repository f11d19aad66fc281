//! SVG price chart with trade markers.
//!
//! The close-price series becomes a polyline; executed buys are drawn as
//! upward red triangles and sells as downward green triangles at the trade
//! price. Rendering is a plain string build, no drawing library involved.

use crate::domain::crossover::SignalRow;
use crate::domain::simulator::TradeEvent;

const WIDTH: f64 = 880.0;
const HEIGHT: f64 = 360.0;
const PADDING: f64 = 48.0;

pub fn render_price_chart(rows: &[SignalRow], buys: &[TradeEvent], sells: &[TradeEvent]) -> String {
    if rows.is_empty() {
        return "No price data available.".to_string();
    }

    let min_close = rows.iter().map(|r| r.close).fold(f64::INFINITY, f64::min);
    let max_close = rows
        .iter()
        .map(|r| r.close)
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max_close - min_close;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if rows.len() > 1 {
        plot_width / (rows.len() - 1) as f64
    } else {
        0.0
    };

    let x_at = |index: usize| PADDING + index as f64 * scale_x;
    let y_at = |close: f64| HEIGHT - PADDING - (close - min_close) * scale_y;

    let points: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| format!("{:.1},{:.1}", x_at(i), y_at(row.close)))
        .collect();

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}" width="{WIDTH:.0}" height="{HEIGHT:.0}">"##
    );

    // axes
    svg.push_str(&format!(
        r##"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#888" stroke-width="1"/>"##,
        x = PADDING,
        top = PADDING,
        bottom = HEIGHT - PADDING,
    ));
    svg.push_str(&format!(
        r##"<line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#888" stroke-width="1"/>"##,
        left = PADDING,
        right = WIDTH - PADDING,
        y = HEIGHT - PADDING,
    ));

    // scale labels
    svg.push_str(&format!(
        r##"<text x="{x:.1}" y="{y:.1}" font-size="11" fill="#aaa" text-anchor="end">{max_close:.2}</text>"##,
        x = PADDING - 6.0,
        y = PADDING + 4.0,
    ));
    svg.push_str(&format!(
        r##"<text x="{x:.1}" y="{y:.1}" font-size="11" fill="#aaa" text-anchor="end">{min_close:.2}</text>"##,
        x = PADDING - 6.0,
        y = HEIGHT - PADDING + 4.0,
    ));
    svg.push_str(&format!(
        r##"<text x="{x:.1}" y="{y:.1}" font-size="11" fill="#aaa">{date}</text>"##,
        x = PADDING,
        y = HEIGHT - PADDING + 16.0,
        date = rows[0].date,
    ));
    svg.push_str(&format!(
        r##"<text x="{x:.1}" y="{y:.1}" font-size="11" fill="#aaa" text-anchor="end">{date}</text>"##,
        x = WIDTH - PADDING,
        y = HEIGHT - PADDING + 16.0,
        date = rows[rows.len() - 1].date,
    ));

    svg.push_str(&format!(
        r##"<polyline fill="none" stroke="#4a90d9" stroke-width="1.5" points="{}"/>"##,
        points.join(" ")
    ));

    for event in buys {
        if let Some((x, y)) = marker_position(rows, event, &x_at, &y_at) {
            svg.push_str(&format!(
                r##"<polygon points="{x:.1},{top:.1} {l:.1},{base:.1} {r:.1},{base:.1}" fill="#d64545"><title>buy {units} at {price:.2} on {date}</title></polygon>"##,
                top = y - 8.0,
                l = x - 6.0,
                r = x + 6.0,
                base = y + 5.0,
                units = event.units,
                price = event.price,
                date = event.date,
            ));
        }
    }
    for event in sells {
        if let Some((x, y)) = marker_position(rows, event, &x_at, &y_at) {
            svg.push_str(&format!(
                r##"<polygon points="{x:.1},{bottom:.1} {l:.1},{base:.1} {r:.1},{base:.1}" fill="#3f9d63"><title>sell {units} at {price:.2} on {date}</title></polygon>"##,
                bottom = y + 8.0,
                l = x - 6.0,
                r = x + 6.0,
                base = y - 5.0,
                units = event.units,
                price = event.price,
                date = event.date,
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn marker_position(
    rows: &[SignalRow],
    event: &TradeEvent,
    x_at: &impl Fn(usize) -> f64,
    y_at: &impl Fn(f64) -> f64,
) -> Option<(f64, f64)> {
    let index = rows
        .binary_search_by_key(&event.date, |row| row.date)
        .ok()?;
    Some((x_at(index), y_at(event.price)))
}
