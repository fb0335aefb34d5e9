//! Catalog of terminal treatment codes.
//!
//! Treatment codes are persisted inconsistently across document
//! families (`"D 10"` on some, `"D10"` on others), so membership is
//! checked on a whitespace-free canonical form.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Terminal disposal and recovery codes, in compact form.
///
/// Transit codes are deliberately absent: R12/R13 and D9/D13/D14/D15
/// denote further downstream processing, so a document carrying one of
/// them is not the end of the chain.
pub const FINAL_OPERATION_CODES: [&str; 23] = [
    "R0", "R1", "R2", "R3", "R4", "R5", "R6", "R7", "R8", "R9", "R10", "R11", "D1", "D2", "D3",
    "D4", "D5", "D6", "D7", "D8", "D9F", "D10", "D12",
];

static FINAL_CODES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| FINAL_OPERATION_CODES.iter().copied().collect());

/// Strip all whitespace from a treatment code.
pub fn normalize_operation_code(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether a treatment code denotes a terminal operation.
///
/// Whitespace-insensitive; empty or blank input is not final.
pub fn is_final_operation_code(code: &str) -> bool {
    FINAL_CODES.contains(normalize_operation_code(code).as_str())
}
