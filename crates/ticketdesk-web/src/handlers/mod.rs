//! API 핸들러 모듈.

pub mod classify;
pub mod stats;
pub mod tickets;
