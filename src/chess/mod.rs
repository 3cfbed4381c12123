//! Implementation of the chess variant environment: board, its rules and
//! specifics.
//!
//! Unlike regular chess, there is no check: the king can be captured and doing
//! so ends the game. Stalemate, repetitions and the fifty-move rule do not
//! exist either.

pub mod apply;
pub mod board;
pub mod core;
pub mod export;
pub mod movegen;
pub mod position;
