//! Embedded schema documents.
//!
//! One JSON Schema per endpoint response shape, compiled lazily and shared
//! process-wide; the documents are immutable static data so concurrent
//! readers need no coordination.

use crate::validate::Schema;
use lazy_static::lazy_static;

fn embedded(name: &'static str, source: &'static str) -> Schema {
    let document = serde_json::from_str(source)
        .unwrap_or_else(|e| panic!("embedded schema '{name}' is not valid JSON: {e}"));
    Schema::new(name, document)
}

lazy_static! {
    pub static ref LOGIN_SUCCESS: Schema = embedded(
        "login-success",
        include_str!("schemas/auth/login-success.schema.json")
    );
    pub static ref LOGIN_ERROR: Schema = embedded(
        "login-error",
        include_str!("schemas/auth/login-error.schema.json")
    );
    pub static ref USERS_LIST: Schema = embedded(
        "users-list",
        include_str!("schemas/users/users-list.schema.json")
    );
    pub static ref SINGLE_USER: Schema = embedded(
        "single-user",
        include_str!("schemas/users/single-user.schema.json")
    );
    pub static ref USER_CREATED: Schema = embedded(
        "user-created",
        include_str!("schemas/users/user-created.schema.json")
    );
    pub static ref USER_UPDATED: Schema = embedded(
        "user-updated",
        include_str!("schemas/users/user-updated.schema.json")
    );
}
