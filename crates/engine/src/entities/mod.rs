//! Entity handles.

mod entity_handle;

pub use entity_handle::EntityHandle;
