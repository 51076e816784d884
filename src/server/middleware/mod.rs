//! Request guards and layers applied in front of the controllers.

pub mod auth;
pub mod rate_limit;

#[cfg(test)]
mod test;
