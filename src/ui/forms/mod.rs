//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `wizard_form`: Family-member wizard

mod field_renderer;
mod wizard_form;

pub use wizard_form::draw_wizard;
