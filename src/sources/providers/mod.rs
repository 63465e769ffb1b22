// src/sources/providers/mod.rs
pub mod currents;
pub mod google_trends;
pub mod hackernews;
pub mod instagram;
pub mod lastfm;
pub mod reddit;
pub mod scraper;
pub mod tiktok;
pub mod youtube;
