//! Text utilities shared by the TTS and search handlers.

pub mod czech;
pub mod guard;
pub mod lang;

pub use czech::expand_for_speech;
pub use guard::has_repeating_pattern;
pub use lang::{detect_language, Language};
