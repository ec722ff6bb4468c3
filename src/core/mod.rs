// src/core/mod.rs
pub mod corpus;
pub mod direction;
pub mod engine;
pub mod filter;
pub mod glyph;
pub mod memo;
pub mod ngram;
pub mod state;
pub mod types;
pub mod views;
