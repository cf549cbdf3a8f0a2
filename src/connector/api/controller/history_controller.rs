use anyhow::Result;

use crate::History;

use super::super::Container;

pub struct HistoryController<'a> {
    container: &'a Container,
}

impl<'a> HistoryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self) -> Result<String> {
        let controller = self.container.history_controller().await;
        Ok(self.format_history(&controller.history()))
    }

    fn format_history(&self, history: &History) -> String {
        if history.is_empty() {
            return "No recent queries.".to_string();
        }

        let mut output = "Recent queries:\n\n".to_string();
        for (i, query) in history.entries().iter().enumerate() {
            let preview = query.output().lines().next().unwrap_or_default();
            output.push_str(&format!("  {}. {}\n", i + 1, query.domain()));
            output.push_str(&format!("     {}\n", preview));
        }
        output
    }
}
