//! # Request Protocol
//!
//! Text boundary between a front end and the engine. Requests are JSON
//! objects ([`crate::request::DrawingRequest`]); responses are JSON objects
//! on a single line.
//!
//! - Line loop: one request per input line, the bare report per output line,
//!   `{"error": ..., "code": ...}` for a bad line
//! - One-shot: the report wrapped as `{"result": {...}}`
//!
//! Nothing here fails: every error becomes an error object so a loop can
//! carry on with the next line.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::calculate;
use crate::errors::{DrawError, DrawResult};
use crate::materials::StockDieTable;
use crate::report::ScheduleReport;
use crate::request::DrawingRequest;

/// Error object written in place of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&DrawError> for ErrorResponse {
    fn from(err: &DrawError) -> Self {
        ErrorResponse {
            error: err.to_string(),
            code: err.error_code().to_string(),
        }
    }
}

/// One-shot success wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: ScheduleReport,
}

/// Serialized response plus the error behind it, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub body: String,
    pub error: Option<DrawError>,
}

impl Response {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn failure(err: DrawError) -> Self {
        if err.is_request_error() {
            tracing::warn!(code = err.error_code(), "rejected request: {}", err);
        } else {
            tracing::error!(code = err.error_code(), "request failed: {}", err);
        }
        let body = to_json_line(&ErrorResponse::from(&err));
        Response { body, error: Some(err) }
    }
}

/// Compute the report for a parsed request.
pub fn process_request(request: &DrawingRequest, table: &StockDieTable) -> DrawResult<ScheduleReport> {
    let input = request.normalize()?;
    let schedule = calculate(&input, table)?;
    Ok(ScheduleReport::from_schedule(&schedule))
}

/// Parse and compute a JSON request.
pub fn process_json(json: &str, table: &StockDieTable) -> DrawResult<ScheduleReport> {
    let request: DrawingRequest = serde_json::from_str(json)?;
    process_request(&request, table)
}

/// Handle one line of the request loop. Blank lines produce no response.
pub fn handle_line(line: &str, table: &StockDieTable) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("request", %request_id);
    let _guard = span.enter();

    let response = match process_json(line, table) {
        Ok(report) => Response {
            body: to_json_line(&report),
            error: None,
        },
        Err(err) => Response::failure(err),
    };
    Some(response)
}

/// Handle a single request given as a command-line argument.
pub fn handle_one_shot(json: &str, table: &StockDieTable) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("one_shot", %request_id);
    let _guard = span.enter();

    match process_json(json, table) {
        Ok(result) => Response {
            body: to_json_line(&ResultResponse { result }),
            error: None,
        },
        Err(err) => Response::failure(err),
    }
}

fn to_json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"error":"Serialization error: {}","code":"SERIALIZATION_ERROR"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}
