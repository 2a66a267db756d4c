pub mod instance;
pub mod upload;
