use crate::{
    error::FetchError,
    raw::{Author, RawPublication},
};

mod html;
pub mod replay;
pub mod scholar;

/// Where profiles and their publication records come from.
///
/// Resolving yields the profile plus one stub per listed publication, in profile order. Each stub
/// is cheap and incomplete; `fill` turns it into a full [`RawPublication`] and may fail on its own
/// without affecting the others.
pub trait ProfileSource {
    type Stub;

    fn resolve(&self, scholar_id: &str) -> Result<Author<Self::Stub>, FetchError>;
    fn fill(&self, stub: &Self::Stub) -> Result<RawPublication, FetchError>;
}
