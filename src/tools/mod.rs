mod file_hasher;
mod filename_matcher;
mod path_validator;

pub use file_hasher::{DEFAULT_PARTIAL_HASH_THRESHOLD, calculate_fingerprint};
pub use filename_matcher::{
    CameraFile, CameraFileKey, FileKind, GRAMMARS, Grammar, LOWRES_EXTENSION, LOWRES_HEADER,
    MAIN_EXTENSION, Segment, match_camera_file, match_camera_path,
};
pub use path_validator::{ensure_directory_exists, resolve_existing_path};
