//! shipdeck library
//!
//! Backend client, page state and terminal rendering for the shipdeck
//! deployment dashboard.

pub mod app;
pub mod authn;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod pages;
pub mod render;
pub mod storage;
pub mod utils;
pub mod workers;
