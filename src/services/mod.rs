pub mod alternatives;
pub mod openweather;
pub mod scoring;
pub mod weather;
