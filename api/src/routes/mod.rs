pub mod generate;
pub mod health_route;
