//! Small helpers shared between crates in the workspace.

use std::sync::mpsc;

/// Sends `value` on `sender`, logging a warning if the receiving end has gone away.
///
/// Returns `true` if the value was sent.
pub fn send_or_log_warning<T>(sender: &mpsc::Sender<T>, description: &str, value: T) -> bool {
    match sender.send(value) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("Failed to send {description} on channel; receiver dropped.");
            false
        }
    }
}
