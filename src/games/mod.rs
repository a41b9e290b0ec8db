//! Rule engine implementations.
//!
//! - `english`: English draughts (checkers)

pub mod english;
