//! # Schedule Calculations
//!
//! The die schedule pipeline, split by stage:
//!
//! - [`progression`] - Drafting strategies producing the diameter sequence
//! - [`schedule`] - End-to-end calculation and the per-stage result
//! - [`overrides`] - Manual diameter edits
//! - [`speed`] - Stage speeds and output mass flow
//!
//! All calculations take a validated [`crate::request::DrawingInput`] and
//! return `DrawResult<_>`; none of them keep state between calls.

pub mod overrides;
pub mod progression;
pub mod schedule;
pub mod speed;

pub use progression::{DraftingStrategy, DraftingType, Progression, ProgressionInput};
pub use schedule::{calculate, DieStage, DrawingSchedule, ScheduleSeries};
pub use speed::Throughput;
