//! Bridge for driving suspending transfers from blocking callers

use std::future::Future;
use std::io;

use tokio::runtime::RuntimeFlavor;

use crate::error::Result;

/// Runs a suspending transfer to completion on behalf of a blocking caller.
///
/// Reuses the ambient tokio runtime when one is present (entering it via
/// `block_in_place` on multi-thread runtimes), otherwise owns a private
/// current-thread runtime for the duration of the call.
pub(crate) struct BlockingBridge {
    handle: Option<tokio::runtime::Handle>,
    owned: Option<tokio::runtime::Runtime>,
}

impl BlockingBridge {
    pub(crate) fn acquire() -> Result<Self> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Ok(Self {
                handle: Some(handle),
                owned: None,
            }),
            Err(_) => {
                let runtime = tokio::runtime::Builder::new_current_thread().build()?;
                Ok(Self {
                    handle: None,
                    owned: Some(runtime),
                })
            }
        }
    }

    pub(crate) fn run<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        if let Some(handle) = &self.handle {
            return match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    tokio::task::block_in_place(|| handle.block_on(fut))
                }
                _ => Err(io::Error::other(
                    "blocking transfer is not supported on a current-thread tokio runtime; \
                     use the suspending entry points instead",
                )
                .into()),
            };
        }
        if let Some(runtime) = &self.owned {
            return runtime.block_on(fut);
        }
        Err(io::Error::other("missing runtime handle").into())
    }
}
