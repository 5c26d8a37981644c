pub mod monitor;
pub mod profile;

pub use monitor::{
    ColumnSpec, DirectorySignalSource, combination_from_filename, load_signal, parse_signal,
};
pub use profile::{load_profile, parse_profile};
