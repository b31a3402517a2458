pub mod name_normalizer;

pub use name_normalizer::{DedupMode, NameNormalizer, NormalizedNames};
