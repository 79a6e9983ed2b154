mod collection;
mod entry;
mod keyword;

pub use collection::Collection;
pub use entry::Entry;
pub use keyword::KeywordRecord;
