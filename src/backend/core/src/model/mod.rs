//! Data model: Spaces and their bindings, caller identities, and the
//! Workspace view produced for API clients.
//!
//! - **Space objects**: [`Space`], [`SpaceBinding`], [`SpaceBindingRequest`],
//!   [`NsTemplateTier`] as read from the object store
//! - **Identities**: [`Signup`], [`Caller`], [`Identity`]
//! - **Views**: [`Workspace`], [`Binding`], [`WorkspaceList`], assembled per request

pub mod identity;
pub mod space;
pub mod workspace;

pub use identity::{Caller, Identity, IdentityKind, Signup, PUBLIC_VIEWER_USERNAME};
pub use space::{
    BindingRequestRef, NsTemplateTier, Space, SpaceBinding, SpaceBindingRequest,
    SpaceBindingSelector, SpaceNamespace,
};
pub use workspace::{
    Binding, BindingAction, ObjectMeta, Workspace, WorkspaceList, WorkspaceStatus, WorkspaceType,
    API_VERSION,
};
