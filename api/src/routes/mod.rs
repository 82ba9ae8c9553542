pub mod answer;
pub mod health_route;
