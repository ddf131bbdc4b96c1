pub mod availability_service;
pub mod generation_service;
pub mod grid_service;
pub mod range_parser;
pub mod schedule_provider;
pub mod time_parser;
