pub mod history_controller;
pub mod run_controller;
pub mod serve_controller;
pub mod show_controller;

pub use history_controller::HistoryController;
pub use run_controller::RunController;
pub use serve_controller::ServeController;
pub use show_controller::ShowController;
