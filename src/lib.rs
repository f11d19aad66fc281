//! macdeval — MACD crossover trade evaluator.
//!
//! Fetches a daily price history for one instrument, derives the MACD and
//! signal lines, walks the crossover transitions with a capped buy/sell
//! simulation, and renders the outcome as a price chart with trade markers.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
