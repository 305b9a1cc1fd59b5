pub mod media_key;
pub mod representative;
