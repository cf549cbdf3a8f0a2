use crate::domain::Query;

/// State transitions published by the studio controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioEvent {
    DomainChanged(String),
    OutputChanged(String),
    LoadingChanged(bool),
    HistoryChanged(Vec<Query>),
}

/// Display layer hook. Called synchronously, in publication order.
pub trait StudioObserver: Send + Sync {
    fn on_event(&self, event: &StudioEvent);
}
