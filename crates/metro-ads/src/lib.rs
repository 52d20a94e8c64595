//! Backend for a metro advertising sales platform: the public lead-capture
//! surface plus the internal CMS that maintains station, line, and product
//! master data.

pub mod cms;
pub mod config;
pub mod error;
pub mod telemetry;
