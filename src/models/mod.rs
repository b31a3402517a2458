pub mod follow;
pub mod loaders;
pub mod name;
pub mod profile;

pub use follow::FollowOutcome;
pub use loaders::{load_names_file, load_names_file_shuffled};
pub use name::CleanName;
pub use profile::{IdentifierField, ProfileMatch};
