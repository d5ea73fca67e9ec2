mod io;
mod types;

pub use io::{is_conventional_lock_name, render_lockfile};
pub use types::{LockDocument, CREATED_BY, DEFAULT_LOCK_FILE, LOCK_VERSION};
