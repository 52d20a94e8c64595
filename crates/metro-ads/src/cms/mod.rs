//! CMS domain: master data, lead intake, bulk transfer, and the session gate.

pub mod leads;
pub mod masters;
pub mod session;
pub mod transfer;
