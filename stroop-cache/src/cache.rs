use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
pub use string_cache::DefaultAtom as Atom;

/// Handle to an interned string. Stable for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextId(u32);

impl TextId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Default)]
struct Interner {
    atoms: Vec<Atom>,
    ids: HashMap<Atom, TextId>,
}

lazy_static! {
    static ref TEXT_INTERNER: RwLock<Interner> = RwLock::new(Interner::default());
}

/// Intern a string and return its id
pub fn intern_text(s: &str) -> TextId {
    let atom = Atom::from(s);
    let known = TEXT_INTERNER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .ids
        .get(&atom)
        .copied();
    if let Some(id) = known {
        return id;
    }

    let mut interner = TEXT_INTERNER.write().unwrap_or_else(PoisonError::into_inner);
    // another thread may have won the race between the two locks
    if let Some(id) = interner.ids.get(&atom) {
        return *id;
    }
    let id = TextId(interner.atoms.len() as u32);
    interner.atoms.push(atom.clone());
    interner.ids.insert(atom, id);
    id
}

/// Id of an already interned string. Never grows the table.
pub fn lookup_text(s: &str) -> Option<TextId> {
    TEXT_INTERNER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .ids
        .get(&Atom::from(s))
        .copied()
}

/// Intern several strings at once, e.g. labels known at startup.
pub fn intern_all<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<TextId> {
    texts.into_iter().map(intern_text).collect()
}

pub fn resolve(id: TextId) -> Option<Atom> {
    TEXT_INTERNER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .atoms
        .get(id.index())
        .cloned()
}

/// Current count of unique texts
pub fn text_count() -> usize {
    TEXT_INTERNER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .atoms
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn same_text_same_id() {
        let a = intern_text("Press Space to begin");
        let b = intern_text("Press Space to begin");
        let c = intern_text("Press Space when ready");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ids_resolve_to_their_text() {
        let id = intern_text("Trial 7 / 20");
        assert_eq!(resolve(id).as_deref(), Some("Trial 7 / 20"));
        assert!(text_count() > id.index());
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(lookup_text("typed once, never interned"), None);
        assert_eq!(lookup_text("typed once, never interned"), None);

        let id = intern_text("Esc to quit");
        assert_eq!(lookup_text("Esc to quit"), Some(id));
    }

    #[test]
    fn unknown_id_resolves_to_none() {
        assert!(resolve(TextId(u32::MAX)).is_none());
    }

    #[test]
    fn concurrent_interning_agrees() {
        let labels: Vec<String> = (0..50).map(|i| format!("concurrent label {i}")).collect();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let labels = labels.clone();
                thread::spawn(move || intern_all(labels.iter().map(String::as_str)))
            })
            .collect();
        let results: Vec<Vec<TextId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for ids in &results[1..] {
            assert_eq!(ids, &results[0]);
        }
    }
}
