//! Rule engine trait for draughts variants.
//!
//! Variants implement `RuleEngine` to define:
//! - Legal destinations for each piece
//! - How moves modify the board
//! - When the turn passes
//!
//! A session picks its variant once, through `Variant`, and only talks to
//! the boxed engine afterwards.

pub mod engine;

pub use engine::{RuleEngine, Variant};
