pub mod configs;
pub mod languages_route;
pub mod translate;
