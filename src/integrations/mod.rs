//! External service integrations.

pub mod email_client {
    pub use crate::email_client::*;
}

pub mod db_storage {
    pub use crate::db_storage::*;
}

pub mod rest_storage {
    pub use crate::rest_storage::*;
}

pub mod webhook_models {
    pub use crate::webhook_models::*;
}
