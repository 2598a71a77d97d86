//! Application services for the round bounded context.
//!
//! Free handler functions orchestrate the domain rules over the repository
//! seams: resolve collaborators, apply the transition, persist.

pub mod archiver;
pub mod coordinator;
pub mod ledger;
pub mod lifecycle;
