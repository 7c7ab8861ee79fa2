//! HTTP handlers

pub mod health;
pub mod form;
pub mod assess;
pub mod model;

#[cfg(test)]
mod tests;
