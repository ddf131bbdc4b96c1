pub mod availability;
pub mod grid;
pub mod time_of_day;
