//! 도메인 모델.

pub mod classification;
pub mod stats;
pub mod ticket;
