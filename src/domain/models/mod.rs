mod history;
mod prompt;
mod query;

pub use history::*;
pub use prompt::*;
pub use query::*;
