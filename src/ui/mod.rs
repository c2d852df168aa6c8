//! Ratatui front-end: a grid of actions, a modal form per action, and a
//! result dialog. All data access goes through [`crate::Club`].

mod actions;
mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
