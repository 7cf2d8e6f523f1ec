pub mod pqai;

pub use pqai::PqaiBackend;
