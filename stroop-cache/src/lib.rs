pub mod cache;
pub use cache::{Atom, TextId, intern_all, intern_text, lookup_text, resolve, text_count};
