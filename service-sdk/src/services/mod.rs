//! Service-specific client implementations
//!
//! Each submodule provides a typed client for one external service:
//!
//! - `ticketing`: issue search, issue creation and credential validation
//!   against the ticketing system's REST API
//! - `commerce`: request listing and conversation messages against the
//!   commerce platform's public API

pub mod commerce;
pub mod common;
pub mod ticketing;
