pub mod adapter;
pub mod client;

pub use client::{EspnClient, SportsDataSource, UpstreamError};
