pub mod compound;
pub mod error;
pub mod generator;
pub mod models;
pub mod paytable;
pub mod scoring;
pub mod service;
pub mod source;
pub mod summary;

pub use error::{Happy8Error, Result};
