use anyhow::{bail, Result};

use crate::SubmitOutcome;

use super::super::Container;

pub struct RunController<'a> {
    container: &'a Container,
}

impl<'a> RunController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn run(&self, domain: String, endpoint: Option<String>) -> Result<String> {
        let controller = self
            .container
            .studio_controller(endpoint.as_deref())
            .await?;

        match controller.submit(&domain).await {
            SubmitOutcome::Ignored => bail!("Enter a company domain (e.g. qualifacts.com)"),
            SubmitOutcome::Failed => bail!("{}", controller.output()),
            SubmitOutcome::Busy => bail!("A request is already in progress"),
            SubmitOutcome::CacheHit | SubmitOutcome::Fetched => Ok(controller.output()),
        }
    }
}
