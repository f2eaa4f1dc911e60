//! The workspace engine.
//!
//! A request flows through:
//!
//! 1. [`IdentityResolver`]: caller → identity (or the public viewer)
//! 2. [`SpaceBindingLister`](crate::source::SpaceBindingLister): ancestor-inclusive bindings
//! 3. [`AccessPolicy`]: exactly one applicable binding, or not found
//! 4. [`classify_bindings`]: binding rows plus unconverged requests
//! 5. [`WorkspaceAssembler`]: the [`Workspace`](crate::model::Workspace) view
//!
//! [`SpaceLister`] ties these together for the get and list paths.

pub mod access;
pub mod assembler;
pub mod classifier;
pub mod identity;
pub mod lister;

pub use access::{AccessDecision, AccessPolicy};
pub use assembler::WorkspaceAssembler;
pub use classifier::{classify_bindings, BindingOrigin};
pub use identity::{IdentityResolver, Resolution};
pub use lister::SpaceLister;
