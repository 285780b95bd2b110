//! Indicadores - accumulated Brazilian economic indicators
//!
//! Fetches the monthly inflation indices, CDI and savings yield from the
//! Central Bank SGS API and Ibovespa / USD-BRL closes from Yahoo Finance,
//! aligns them on month ends and computes what each one accumulated over a
//! trailing window.

pub mod accumulate;
pub mod aligner;
pub mod cli;
pub mod config;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod shell;
pub mod sources;
pub mod timeseries;
pub mod utils;
pub mod window;
