use anyhow::{anyhow, Result};

use super::super::Container;

pub struct ShowController<'a> {
    container: &'a Container,
}

impl<'a> ShowController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn show(&self, domain: String) -> Result<String> {
        let controller = self.container.history_controller().await;
        controller
            .select(&domain)
            .map(|query| query.output().to_string())
            .ok_or_else(|| anyhow!("No stored brief for {domain}; run `linkr run {domain}` first"))
    }
}
