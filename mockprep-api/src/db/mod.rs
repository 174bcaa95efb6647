//! Database access for mockprep-api
//!
//! Schema creation lives in `mockprep_common::db`; these modules are the
//! row-level reads and writes the handlers need.

pub mod answers;
pub mod interviews;
