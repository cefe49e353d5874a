//! Form-state primitives shared by the HTML views and the REST API.
//!
//! # Structure
//!
//! - [`list`]: ordered record collections with add/update/remove by id
//! - [`selection`]: toggle set over the platform catalog
//! - [`form`]: required-field guard that runs before any submit action

pub mod form;
pub mod list;
pub mod selection;

pub use form::{FormError, RequiredFields, submit};
pub use list::{EditorError, FieldError, IdGenerator, ListEditor, Record};
pub use selection::{PlatformSelection, SelectionError, Toggle, selectable};
