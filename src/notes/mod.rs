//! Note storage subsystem.
//!
//! # Data Flow
//! ```text
//! URL path segment
//!     → slug.rs (validate, map to file name)
//!     → store.rs (load / create / versioned update under per-slug lock)
//!     → model.rs (JSON record on disk)
//!     → notify.rs (change events after successful updates)
//! ```

pub mod model;
pub mod notify;
pub mod slug;
pub mod store;

pub use model::Note;
pub use notify::{ChangeEvent, ChangeNotifier, LogNotifier};
pub use slug::{Slug, SlugError};
pub use store::{NoteStore, StoreError};
