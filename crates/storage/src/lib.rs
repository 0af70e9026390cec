#![forbid(unsafe_code)]

pub mod profile_record;
pub mod repository;
pub mod sqlite;

pub use profile_record::{PROFILE_KEY, decode_profile, encode_profile};
pub use repository::{
    InMemoryRepository, KeyValueProfileRepository, KeyValueStore, ProfileRepository, Storage,
    StorageError,
};
