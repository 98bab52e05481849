//! File I/O primitives for the snapshot store.

mod atomic;

pub use atomic::{
    StagedFile, TEMP_SUFFIX, commit_all, is_temp_name, stage, temp_path_for, write_atomic,
};
