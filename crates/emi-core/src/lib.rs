pub mod error;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "currency")]
pub mod currency;

pub use error::EmiError;
pub use types::*;

/// Standard result type for fallible emi-core operations
pub type EmiResult<T> = Result<T, EmiError>;
