//! Process exit codes, values taken from BSD `sysexits.h`.

/// Bad flags, unknown node ids, drops that would create a cycle
pub const USAGE: i32 = 64;

/// Stored sequence breaks the depth rules
pub const DATAERR: i32 = 65;

/// No store yet, or the tree is empty
pub const NOINPUT: i32 = 66;

/// Store file cannot be created or would be clobbered
pub const CANTCREAT: i32 = 73;

/// Reading or writing the store failed
pub const IOERR: i32 = 74;

/// Config file unreadable or malformed
pub const CONFIG: i32 = 78;
