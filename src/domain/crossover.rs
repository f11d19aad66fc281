//! Crossover detection over MACD rows.
//!
//! A row is "above" when its MACD value strictly exceeds the signal line.
//! The transition is the day-over-day change of that flag. The first row has
//! no prior day to diff against and is always `Flat`.

use chrono::NaiveDate;

use crate::domain::indicator::MacdRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// MACD crossed above the signal line.
    Up,
    /// MACD crossed below the signal line.
    Down,
    /// No crossover.
    Flat,
}

/// A chart-ready row: the close price plus the crossover state for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    pub above_signal: bool,
    pub transition: Transition,
}

pub fn detect_transitions(rows: &[MacdRow]) -> Vec<SignalRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut prev_above: Option<bool> = None;

    for row in rows {
        let above = row.macd > row.signal;
        let transition = match prev_above {
            None => Transition::Flat,
            Some(false) if above => Transition::Up,
            Some(true) if !above => Transition::Down,
            Some(_) => Transition::Flat,
        };
        prev_above = Some(above);

        out.push(SignalRow {
            date: row.date,
            close: row.close,
            above_signal: above,
            transition,
        });
    }

    out
}
