pub mod config_io;
pub mod morph_engine;
pub mod photo_collection;
