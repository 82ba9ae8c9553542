pub mod answer_request;
pub mod answer_route;
