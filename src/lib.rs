pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `ppcheckout::checkout` instead of `ppcheckout::core::checkout`
pub use core::*;
pub use utils::*;
