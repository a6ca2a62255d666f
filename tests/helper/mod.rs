#![allow(dead_code)]

mod registry;

pub use registry::{MockRegistry, create_history, create_pypi_body};
