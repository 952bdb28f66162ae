pub mod generate_response;
pub mod generate_route;
