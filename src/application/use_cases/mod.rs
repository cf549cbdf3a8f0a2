mod relay_domain;
mod studio_controller;

pub use relay_domain::*;
pub use studio_controller::*;
