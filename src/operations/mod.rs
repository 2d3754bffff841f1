//! Operations module provides the command-line use cases built on the session

pub mod comments;
pub mod lookup;
pub mod stream;

use crate::client::{DataTask, RedditClientError};
use tokio::sync::oneshot;

/// Completion callback paired with the receiver it delivers into.
pub(crate) fn delivery<T: Send + 'static>() -> (
    impl FnOnce(Result<T, RedditClientError>) + Send + 'static,
    oneshot::Receiver<Result<T, RedditClientError>>,
) {
    let (tx, rx) = oneshot::channel();
    let completion = move |result: Result<T, RedditClientError>| {
        // The receiver only goes away if the operation itself was dropped
        let _ = tx.send(result);
    };
    (completion, rx)
}

/// Wait for a dispatched task and take the result its callback delivered.
pub(crate) async fn await_delivery<T>(
    task: DataTask,
    rx: oneshot::Receiver<Result<T, RedditClientError>>,
) -> Result<T, RedditClientError> {
    let state = task.await;
    rx.await.map_err(|_| {
        RedditClientError::Network(format!("request ended without a result ({:?})", state))
    })?
}
