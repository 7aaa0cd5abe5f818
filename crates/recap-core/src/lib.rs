pub mod api;
pub mod error;
pub mod form;
pub mod options;
pub mod poll;
pub mod stage;

#[cfg(test)]
pub(crate) mod testutil;
