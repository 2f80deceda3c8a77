//! HEP Times - arXiv listings as a morning paper
//!
//! This crate fetches the newest submissions in a few arXiv categories on
//! every page view and typesets them as a newspaper-style front page.

pub mod category;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod latex;
pub mod routes;
pub mod shaper;
