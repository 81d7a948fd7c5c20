pub mod client;

pub use client::{FetchError, OkxClient};
