//! Staged edits over a key/value record.
//!
//! A [`BufferedStage`] wraps an original record. Writes and deletes go into a
//! buffer and are tracked as dirty keys until they are applied to the original
//! or discarded.
//!
//! ```
//! use std::collections::BTreeMap;
//! use buffered_stage::BufferedStage;
//!
//! let mut user = BTreeMap::from([("name", "stefan".to_string())]);
//! let mut stage = BufferedStage::new(&mut user);
//! stage.set("name", "sam".to_string());
//! assert!(stage.has_changed(&"name"));
//! stage.apply(&[]);
//! assert!(!stage.has_changes());
//! drop(stage);
//! assert_eq!(user["name"], "sam");
//! ```

pub mod config;
pub mod dirty;
pub mod error;
pub mod record;
pub mod selection;
pub mod stage;
pub mod traits;

pub use config::{PresenceRule, StageConfig};
pub use dirty::{DirtyMap, DirtyStatus};
pub use error::{StageError, StageResult};
pub use record::JsonRecord;
pub use selection::KeySelection;
pub use stage::BufferedStage;
pub use traits::{MapStore, Truthy};
