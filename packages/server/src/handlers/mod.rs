pub mod customer;
pub mod health;
pub mod image;
pub mod media;
pub mod record;
