//! Fortiform Core
//!
//! Schema-driven translation between FortiManager API objects and the local
//! attribute trees of a Terraform-style provider

pub mod client;
pub mod data;
pub mod differ;
pub mod patch;
pub mod redact;
pub mod schema;
pub mod translate;
pub mod value;

pub use data::{AttributeStore, ResourceData, StoreError};
pub use patch::{Coercion, PatchTable};
pub use schema::{FieldKind, FieldSpec, ResourceSpec};
pub use translate::{TranslateError, TranslateResult, Translator};
pub use value::{LocalTree, LocalValue, NativeObject, NativeValue, Scalar};
