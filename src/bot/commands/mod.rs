//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Calorie progress and goal commands
pub mod calories;

/// Income, expense, category and budget commands
pub mod finance;

/// Food lookup and meal logging commands
pub mod food;

/// General utility commands
pub mod general;

// Export commands
pub use calories::*;
pub use finance::*;
pub use food::*;
pub use general::*;
