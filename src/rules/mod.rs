//! Game rules for five-in-a-row
//!
//! Five or more in a row on any axis wins. Stones are never removed once
//! played, so no capture or forbidden-move rules apply.

pub mod win;

// Re-exports for convenient access
pub use win::{
    check_winner, makes_five, makes_open_four, open_four_moves, winning_moves,
};
