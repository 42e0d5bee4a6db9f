//! Terminal console for blue tick verification
//!
//! The console has two screens: the company listing and the blue tick
//! workflow of one company. Remote calls run on spawned tasks and report
//! back to the loop through [`events::AppEvent`].

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod ui;

pub use app::App;
