//! # SLA Breach Report
//!
//! Generates an SLA breach report for pending service requests pulled from
//! the commerce platform. For each request the report computes how long it
//! has been waiting and buckets it into a GREEN/YELLOW/RED SLA level.
//! Reviewer notes from the requests' support conversations are clustered by
//! edit-distance similarity; each cluster is reconciled against the
//! ticketing system (existing tickets are linked, one ticket is filed per
//! uncovered cluster) and every covered conversation gets a message citing
//! its ticket.
//!
//! The driver runs three strictly sequential phases — authenticate,
//! configure, stream — and produces rows one at a time; the
//! grouping/reconciliation pipeline runs once per report and its result is
//! shared by every row through an explicit [`driver::ReportContext`].

pub mod driver;
pub mod fields;
pub mod grouping;
pub mod notify;
pub mod params;
pub mod progress;
pub mod reconcile;
pub mod row;

pub use driver::{ReportDriver, ReportError, ReportRun};
pub use params::{FilterSelection, ReportParameters, SlaThresholds};
pub use row::{ReportRow, SlaLevel};

#[cfg(test)]
mod tests;
