pub mod article;
pub mod collection;

pub use article::ArticleRecord;
pub use collection::{Collection, RunState};
