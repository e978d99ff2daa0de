pub mod catalog;
pub mod lenient;
pub mod logger;
pub mod normalize;
pub mod time_utils;
