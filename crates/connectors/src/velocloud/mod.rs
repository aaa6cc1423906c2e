//! VeloCloud Orchestrator portal API.
//!
//! Every log type is a separate JSON-RPC style POST under `/portal/rest`
//! taking an enterprise id and an interval, answering with
//! `{"data": [...], "metaData": {"more": bool}}`. Results come newest first.

pub mod client;
pub mod endpoint;
pub mod types;
