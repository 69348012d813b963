// Public modules
pub mod archive;
pub mod checkout;
pub mod convert;
pub mod error;
pub mod files;
pub mod git;
pub mod http;
pub mod identifier;
pub mod layout;
pub mod logging;
pub mod project_page;
pub mod report;
pub mod settings;
pub mod slugify;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use checkout::{Checkout, CheckoutRequest};
pub use error::{Error, ErrorCode, Result};
pub use report::{CheckoutReport, StepOutcome, StepRecord};
