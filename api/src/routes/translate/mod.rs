pub mod translate_route;
