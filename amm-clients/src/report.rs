//! Last line of defence between the swap pipeline and its caller.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::error;

fn panic_detail(payload: &(dyn Any + Send)) -> String {
  if let Some(msg) = payload.downcast_ref::<&str>() {
    (*msg).to_string()
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg.clone()
  } else {
    "unknown panic".to_string()
  }
}

/// Awaits `fut`, turning a panic into the generic error message so a string
/// is always returned.
pub async fn catch_all<F>(fut: F) -> String
where
  F: Future<Output = String>,
{
  match AssertUnwindSafe(fut).catch_unwind().await {
    Ok(message) => message,
    Err(payload) => {
      let detail = panic_detail(payload.as_ref());
      error!(detail = %detail, "swap panicked");
      format!("Error occurred during transaction: {detail}")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn passes_message_through() {
    let message = catch_all(async { "done".to_string() }).await;
    assert_eq!("done", message);
  }

  #[tokio::test]
  async fn panic_becomes_message() {
    let message = catch_all(async {
      let signature: Option<String> = None;
      signature.unwrap_or_else(|| panic!("vault vanished"))
    })
    .await;
    assert_eq!("Error occurred during transaction: vault vanished", message);
  }
}
