//! fleet-core: framework-agnostic core for the fleet access layer.
//!
//! Everything a server operation needs to talk about tenancy and report an
//! outcome lives here: the tenant context sum type, the action-result
//! envelope with its closed error taxonomy, session types, record values
//! with the wide-integer normalizer, and a small string configuration store.

pub mod config;
pub mod result;
pub mod session;
pub mod tenant;
pub mod value;

pub use config::{FleetConfig, FleetConfigSnapshot};
pub use result::{ActionError, ActionResult, ErrorCode};
pub use session::{Headers, Session, SessionCtx, SessionProvider};
pub use tenant::{TenantContext, TenantFault, TenantId};
pub use value::{normalize, RecordValue};
