//! Wire models for the shipdeck deployment backend.

pub mod models;
