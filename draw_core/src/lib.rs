//! # draw_core - Wire-Drawing Die Schedule Engine
//!
//! `draw_core` computes multi-stage wire-drawing die schedules: given the
//! incoming and finished wire diameters, a material and a die count, it
//! derives every intermediate diameter together with the area reduction,
//! tensile, temperature rise, bearing angle, capstan delta, stock die
//! availability and drawing speed of each die.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every request is computed from scratch
//! - **JSON-First**: requests, reports, errors and the stock die table are all serde types
//! - **Rich Errors**: structured error types with stable codes
//! - **Explicit Tables**: the stock die table is a value passed by reference, never a global
//!
//! ## Quick Start
//!
//! ```rust
//! use draw_core::{process_request, DrawingRequest, StockDieTable};
//!
//! let table = StockDieTable::embedded().unwrap();
//! let request = DrawingRequest::new(10.0, 5.0, 4);
//! let report = process_request(&request, &table).unwrap();
//! assert_eq!(report.diameters, vec![10.0, 8.41, 7.07, 5.95, 5.0]);
//! ```
//!
//! ## Modules
//!
//! - [`request`] - Wire request record, validation and metric normalization
//! - [`calculations`] - Drafting strategies and the schedule pipeline
//! - [`equations`] - Pure formulas (rounding, reduction, temperature, delta)
//! - [`materials`] - Material catalog, tensile models, stock die table
//! - [`report`] - Output record in the caller's units
//! - [`protocol`] - JSON line and one-shot request handling
//! - [`units`] - Unit conversions
//! - [`errors`] - Structured error types
//! - [`file_io`] - Stock table loading and error log

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod protocol;
pub mod report;
pub mod request;
pub mod units;
pub mod value;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, DieStage, DraftingStrategy, DraftingType, DrawingSchedule};
pub use errors::{DrawError, DrawResult};
pub use file_io::{load_stock_table, ErrorLog};
pub use materials::{Material, StockDieTable, TensileModel};
pub use protocol::{handle_line, handle_one_shot, process_json, process_request};
pub use report::ScheduleReport;
pub use request::{AngleMode, DrawingInput, DrawingRequest};
pub use units::{MassFlowUnit, SpeedUnit, UnitSystem};
