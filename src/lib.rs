//! Score warehouse designs and find the best one to compare against.
//!
//! A design is three decisions (storage model, fulfilment logic, automation
//! level). [`scoring::calculate_metrics`] turns a design into five clamped
//! sub-scores and an efficiency index; [`scoring::recommend`] searches all 27
//! designs for the one to show next to the human's choice.

pub mod config;
pub mod design;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
