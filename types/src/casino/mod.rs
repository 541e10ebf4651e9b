//! Casino game-action types.
//!
//! Defines the bet/payout policy for each simulated game and the fixed JSON
//! payload shapes the casino API expects.

mod constants;
mod game;
mod payload;

pub use constants::*;
pub use game::*;
pub use payload::*;

#[cfg(test)]
mod tests;
