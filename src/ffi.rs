//! FFI interface for C/C++ callers
//!
//! Strings cross the boundary as JSON. A successful call returns the
//! `{"success": true, "data": ...}` envelope in `json_ptr`; a fatal
//! precondition failure returns `{"success": false, "error": ...}` in
//! `json_ptr` as well. `error_ptr` is reserved for failures of the FFI
//! layer itself (bad pointers, invalid UTF-8).

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use chrono::NaiveDate;

use crate::engine::{envelope, extract_job};
use crate::error::ExtractError;
use crate::schema::Schema;

/// Result struct returned to C/C++
/// Both pointers are owned by Rust and must be freed via free_extraction_result
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON envelope (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the call itself failed (null-terminated), or null
    pub error_ptr: *mut c_char,
}

/// Extract a job posting from HTML according to a JSON schema.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `schema_json` - Extraction schema as JSON (null-terminated)
/// * `today_iso` - Reference date `YYYY-MM-DD` for relative dates, or null for today
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `schema_json` must be a valid null-terminated C string
/// - `today_iso` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn extract_job_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    schema_json: *const c_char,
    today_iso: *const c_char,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(h) => h,
        Err(msg) => return make_error_result(msg),
    };

    let schema_str = match read_c_str(schema_json) {
        Some(Ok(s)) => s,
        Some(Err(_)) => return make_error_result("Invalid UTF-8 in schema JSON"),
        None => return make_error_result("Schema JSON is null"),
    };

    let today = match read_c_str(today_iso) {
        None => chrono::Local::now().date_naive(),
        Some(Ok(s)) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => return make_error_result(&format!("Invalid reference date '{}': {}", s, e)),
        },
        Some(Err(_)) => return make_error_result("Invalid UTF-8 in reference date"),
    };

    let result = Schema::from_json_str(schema_str)
        .map_err(ExtractError::from)
        .and_then(|schema| extract_job(&html, &schema, today));

    make_json_result(&envelope(&result))
}

/// Validate a JSON schema and return `{"success": bool, "warnings": [...], "error"?: ...}`
///
/// # Safety
/// `schema_json` must be a valid null-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn validate_schema_ffi(schema_json: *const c_char) -> ExtractionResultFFI {
    let schema_str = match read_c_str(schema_json) {
        Some(Ok(s)) => s,
        Some(Err(_)) => return make_error_result("Invalid UTF-8 in schema JSON"),
        None => return make_error_result("Schema JSON is null"),
    };

    let report = match Schema::from_json_str(schema_str).and_then(|s| s.validate().map(|w| (s, w))) {
        Ok((schema, warnings)) => serde_json::json!({
            "success": true,
            "field_count": schema.field_count(),
            "required_fields": schema.required_fields(),
            "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        }),
        Err(e) => serde_json::json!({ "success": false, "error": e.to_string() }),
    };

    make_json_result(&report)
}

/// Free an ExtractionResultFFI returned by this module
///
/// # Safety
/// - `result` must have been returned by a function of this module
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_extraction_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_html(html_ptr: *const c_char, html_len: usize) -> Result<String, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok(String::new());
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice)
        .map(str::to_string)
        .map_err(|_| "Invalid UTF-8 in HTML content")
}

unsafe fn read_c_str<'a>(ptr: *const c_char) -> Option<Result<&'a str, std::str::Utf8Error>> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_str())
    }
}

fn make_json_result(value: &serde_json::Value) -> ExtractionResultFFI {
    match CString::new(value.to_string()) {
        Ok(cstr) => ExtractionResultFFI {
            json_ptr: cstr.into_raw(),
            error_ptr: ptr::null_mut(),
        },
        Err(_) => make_error_result("Result JSON contains null bytes"),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
