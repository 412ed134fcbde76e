pub mod draft;
pub mod folder;
pub mod principles;
pub mod session;

pub use draft::Draft;
pub use folder::{Folder, Prompt};
pub use principles::PrinciplesInput;
pub use session::{derive_title, Message, MessageRole, Session, SessionSummary};

/// First `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
