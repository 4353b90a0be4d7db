//! Application layer of the campus portal client.
//!
//! Coordinates the domain ports into user-facing workflows: the persisted
//! session store, the auth bootstrap and guard, the generic request
//! executor, and the runtime that wires them together.

pub mod bootstrap;
pub mod executor;
pub mod guard;
pub mod session_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::PortalRuntime;
pub use executor::{ExecuteOptions, RequestExecutor, RequestState};
pub use guard::{AuthGuard, GuardState};
pub use session_store::{RegisterPolicy, SessionStore};
