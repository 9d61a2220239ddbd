/// This module contains types that serve as representations
/// of server responses from the console API.

pub mod error;
pub mod token;

// Re-export
pub use self::error::ErrorEnvelope;
pub use self::token::Token;
