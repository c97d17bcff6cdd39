//! Declarations for the federated access stack: parameters, the SAML
//! provider custom resource with its handler, and the roles federated users
//! may assume.

pub mod intrinsic;
pub mod parameter;
pub mod policy;
pub mod role;
pub mod template;

pub use parameter::Parameters;
pub use role::AccessRole;
pub use template::{render, TemplateOptions};
