// Domain-layer modules and shared errors/models
pub mod ingestion {
    pub use crate::ingestion::*;
}

pub mod call_report {
    pub use crate::call_report::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
