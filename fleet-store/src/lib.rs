//! fleet-store: the storage side of the fleet access layer.
//!
//! Two query surfaces exist, and they are kept apart on purpose:
//! - the [`Directory`] is global and untenanted, used only for
//!   organization and membership lookups;
//! - everything else goes through a [`TenantHandle`], which is bound to
//!   one tenant at construction and cannot be pointed anywhere else.

pub mod backend;
pub mod cache;
pub mod directory;
pub mod handle;
pub mod memory;
pub mod router;

pub use backend::StoreBackend;
pub use cache::LabelCache;
pub use directory::{Directory, Organization, Role};
pub use handle::TenantHandle;
pub use memory::{MemoryBackend, MemoryDirectory};
pub use router::StoreRouter;
