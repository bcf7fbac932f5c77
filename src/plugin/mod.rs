pub mod descriptor;
pub mod discovery;
pub mod info;
pub mod options;

pub use discovery::bootstrap_jvm_options;
