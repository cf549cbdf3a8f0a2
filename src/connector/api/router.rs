use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{HistoryController, RunController, ServeController, ShowController};

pub struct Router<'a> {
    serve_controller: ServeController<'a>,
    run_controller: RunController<'a>,
    history_controller: HistoryController<'a>,
    show_controller: ShowController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            serve_controller: ServeController::new(container),
            run_controller: RunController::new(container),
            history_controller: HistoryController::new(container),
            show_controller: ShowController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Serve { port, public } => self.serve_controller.serve(port, public).await,
            Commands::Run { domain, endpoint } => self.run_controller.run(domain, endpoint).await,
            Commands::History => self.history_controller.list().await,
            Commands::Show { domain } => self.show_controller.show(domain).await,
        }
    }
}
