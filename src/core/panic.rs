//! Panic payload rendering shared by every fault boundary.

use std::any::Any;

/// Renders a caught panic payload as text.
///
/// `panic!("literal")` carries a `&'static str`, formatted panics carry a `String`;
/// anything else is reported as `"unknown panic"`.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
