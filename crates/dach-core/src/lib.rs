//! DACHSwitch Core Library
//!
//! Selection state and filtering engine for a country toggle control. A
//! switch holds a set of active labels; every change is projected onto the
//! elements of a host tree by showing those whose country attribute matches
//! an active option and hiding the rest.
//!
//! # Architecture
//!
//! Nothing here depends on a browser. The host tree is reached through the
//! [`filter::TargetTree`] trait and persistence through
//! [`storage::SelectionStore`]; the wasm binding implements both on top of
//! `document` and `localStorage`, while [`dom::MemoryTree`] and
//! [`storage::MemoryStore`] serve tests and tools.
//!
//! # Modules
//!
//! - `types`: Country options, initial selection and visibility values
//! - `config`: Switch configuration and validation
//! - `selection`: Active label set and its initialization
//! - `filter`: Accepted code set and the filter pass
//! - `storage`: Persistence shim
//! - `switch`: Controller tying the above together
//! - `view`: Button view models for renderers
//! - `dom`: In-memory element tree with a small selector matcher

pub mod config;
pub mod dom;
pub mod filter;
pub mod selection;
pub mod storage;
pub mod switch;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::{ConfigError, SwitchConfig};
pub use dom::{MemoryElement, MemoryTree};
pub use filter::{apply_filter, FilterDecision, FilterReport, Target, TargetTree};
pub use selection::{InitialSource, Selection};
pub use storage::{MemoryStore, NoStore, SelectionStore, StorageError};
pub use switch::{ChangeCause, SelectionChange, Switch, SwitchError};
pub use types::{CountryOption, InitialSelection, Visibility};
pub use view::{AllToggle, ToggleButton};
