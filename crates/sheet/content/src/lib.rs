//! List-file persistence for character sheets.
//!
//! This crate reads and writes the JSON list files consumed by `sheet-core`:
//! - Trait lists (`trait_list`, legacy `advantage_list`)
//! - Trait modifier lists (`modifier_list`)
//! - Note lists (`note_list`)
//! - Ancestries (`ancestry`)
//!
//! Loading accepts data versions 2 through 5 and migrates older row shapes;
//! saving always writes the current version. Files are accessed through a
//! [`DataSource`] so the same loaders serve the filesystem and in-memory data.

pub mod error;
pub mod library;
pub mod loaders;
pub mod source;

pub use error::{LoadError, SaveError};
pub use library::{AncestryLibrary, active_ancestries, active_ancestry_traits};
pub use loaders::{
    CURRENT_DATA_VERSION, FileKind, LoadResult, MIN_DATA_VERSION, SaveResult, load_ancestry, load_notes,
    load_trait_modifiers, load_traits, save_ancestry, save_notes, save_trait_modifiers, save_traits,
};
pub use source::{DataSource, FsSource, MemorySource};
