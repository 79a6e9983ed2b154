use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A kind of content on the site. Each collection is its own keyword corpus.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    /// Dream interpretations, keyed by dream keyword.
    Dream,
    /// Fortune dictionary terms.
    Dictionary,
    /// Editorial columns, keyed by title.
    Column,
}
