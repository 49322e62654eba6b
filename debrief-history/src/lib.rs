pub mod enrich;
pub mod error;
pub mod fetch;
pub mod model;
pub mod organize;
pub mod record;
pub mod update;
