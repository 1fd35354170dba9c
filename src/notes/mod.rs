mod store;

pub use store::{IdPolicy, NotesStore};
