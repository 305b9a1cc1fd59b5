//! The media store adapter: translates domain operations into parameterized
//! relational statements. All values go through the query builder's binding;
//! no SQL is assembled from raw strings. Business rules live in the handlers.

pub mod customer;
pub mod media;
pub mod record;
