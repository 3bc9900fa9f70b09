pub mod config;
pub mod error;

pub mod data {
    pub mod loader;
    pub mod record;
    pub mod store;
}

pub mod metrics {
    pub mod summary;
    pub mod table;
}

pub mod workload {
    pub mod synth;
    pub mod trace;
}

pub mod plot {
    pub mod figure;
    pub mod series;
}

pub use error::{Error, Result};
