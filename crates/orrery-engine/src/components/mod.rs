pub mod body;
pub mod catalogue;
pub mod orbit_path;
