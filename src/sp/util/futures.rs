//! Future-related utility code lives here.

use futures::*;

use tokio;

use sp;

// This converts a concrete object implementing the `Future` trait into a
// `Box`ed trait object, so a function can return a variety of Future-traited
// objects with different concrete types while typing them all the same.
pub fn into_future_trait<F, I, E>(f: F) -> Box<dyn Future<Item = I, Error = E> + Send>
where
    F: 'static + Send + Future<Item = I, Error = E>,
{
    Box::new(f)
}

/// Drives a future to completion on a fresh runtime, blocking the calling
/// thread.
///
/// The runtime is torn down before returning, so nothing spawned by the
/// future outlives the call.
pub fn block_on<T>(f: sp::Future<T>) -> sp::Result<T>
where
    T: 'static + Send,
{
    let mut rt = tokio::runtime::Runtime::new()?;
    rt.block_on(f)
}
