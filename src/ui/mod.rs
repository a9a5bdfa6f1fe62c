//! Text front end for the dashboard views.

pub mod terminal;
