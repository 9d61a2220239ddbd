/// Library-wide type definitions.

use futures;

use std::result;

use sp::error;

/// A Result type parameterized by `sp::error::Error`
pub type Result<T> = result::Result<T, error::Error>;

/// A Future type parameterized by `sp::error::Error`
pub type Future<T> = Box<dyn futures::Future<Item = T, Error = error::Error> + Send>;
