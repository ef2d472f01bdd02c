pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod state;
pub mod users;

#[cfg(test)]
mod test_support;
