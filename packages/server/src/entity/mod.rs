pub mod customer;
pub mod record_media;
pub mod treatment_record;
