pub use crate::constants::API_PREFIX;

pub mod cache;
pub mod nowplaying;
pub mod server;
pub mod stations;

pub use server::{build_rocket, start_rocket_server};
