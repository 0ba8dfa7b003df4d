pub mod decode;
pub mod input;
