/// File read when no path is given on the command line
pub const DEFAULT_DATA_PATH: &str = "data.txt";

/// Bytes per `k` suffix
pub const KIB: u64 = 1024;
/// Bytes per `m` suffix
pub const MIB: u64 = 1024 * 1024;

/// First stride of the default sequence
pub const DEFAULT_STRIDE_START: u32 = 1;
/// Last stride (inclusive) of the default sequence
pub const DEFAULT_STRIDE_END: u32 = 31;
