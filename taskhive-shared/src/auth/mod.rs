/// Authentication and authorization
///
/// - `principal`: the tagged principal type resolved once per request
/// - `access`: the Access Evaluator consulted before every resource access
/// - `jwt`: bearer-token claims validation (the Authenticator collaborator)
///
/// Credential issuance (registration, login, password hashing) is owned by
/// an external identity layer; this module only turns an already-signed
/// token into a `Principal`.

pub mod access;
pub mod jwt;
pub mod principal;

pub use access::{authorize_subtask_update, authorize_task_update, evaluate};
pub use principal::{Principal, ProjectActor};
