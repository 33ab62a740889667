pub mod application;
pub mod db_init;
pub mod staff;
