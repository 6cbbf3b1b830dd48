pub mod common;
pub mod config;
pub mod extractor;
pub mod rest;
