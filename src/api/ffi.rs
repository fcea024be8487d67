//! C-compatible API for dashboard hosts outside Rust.
//!
//! Requests and responses are JSON strings. Strings returned by this module
//! are owned by Rust and must be released with `dispatch_free_str`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::Serialize;
use serde_json::json;

use crate::common::config::AppCfg;
use crate::common::error::{DispatchCode, DispatchError};
use crate::inference::domain::ForecastRequest;

use super::forecast::{self, ForecastResponse, Forecaster};

/// ABI version to coordinate with the host.
#[no_mangle]
pub extern "C" fn dispatch_api_version() -> u32 {
    1
}

/// Load config, model artifacts and unit directory. Returns a `DispatchCode`.
#[no_mangle]
pub extern "C" fn dispatch_init() -> u32 {
    match AppCfg::load().and_then(|cfg| forecast::init(&cfg).map(|_| ())) {
        Ok(()) => DispatchCode::Ok as u32,
        Err(err) => {
            log::error!(target: "ffi", "init failed: {err}");
            err.code() as u32
        }
    }
}

/// Run one forecast request and return the JSON response (caller must free).
#[no_mangle]
pub extern "C" fn dispatch_forecast(request: *const c_char) -> *const c_char {
    if request.is_null() {
        return string_to_raw(error_json(&DispatchError::invalid("request pointer is null")));
    }
    let Some(forecaster) = forecast::global() else {
        return string_to_raw(error_json(&DispatchError::config(
            "dispatch_init has not succeeded",
        )));
    };

    let input = unsafe { CStr::from_ptr(request) }.to_string_lossy().to_string();
    string_to_raw(forecast_json(forecaster, &input))
}

/// Free strings allocated by Rust.
#[no_mangle]
pub extern "C" fn dispatch_free_str(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(ptr as *mut c_char);
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    ok: bool,
    #[serde(flatten)]
    response: &'a ForecastResponse,
}

/// Parse a JSON request, forecast it, and encode the outcome as JSON.
pub fn forecast_json(forecaster: &Forecaster, input: &str) -> String {
    let result = serde_json::from_str::<ForecastRequest>(input)
        .map_err(|err| DispatchError::invalid(format!("malformed request: {err}")))
        .and_then(|request| forecaster.forecast(&request));

    match result {
        Ok(response) => serde_json::to_string(&Envelope {
            ok: true,
            response: &response,
        })
        .unwrap_or_else(|err| {
            error_json(&DispatchError::inference(format!(
                "response could not be encoded: {err}"
            )))
        }),
        Err(err) => error_json(&err),
    }
}

fn error_json(err: &DispatchError) -> String {
    json!({
        "ok": false,
        "code": err.code() as u32,
        "error": err.to_string(),
    })
    .to_string()
}

fn string_to_raw(s: String) -> *const c_char {
    // serde_json escapes NUL, so this only fails on a bug.
    match CString::new(s) {
        Ok(cstring) => cstring.into_raw(),
        Err(_) => std::ptr::null(),
    }
}
