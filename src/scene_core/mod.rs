pub mod config;
pub mod sun;
pub mod time_of_day;
