pub mod names_loader;

pub use names_loader::{load_names_file, load_names_file_shuffled};
