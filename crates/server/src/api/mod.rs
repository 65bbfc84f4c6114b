pub mod handlers;
pub mod middleware;
pub mod recommendations;
pub mod routes;
pub mod tags;

pub use routes::create_router;
