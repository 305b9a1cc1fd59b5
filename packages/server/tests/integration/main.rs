mod common;

mod health;
mod record;
