/// Extra leave days used when recommending from stored holidays.
pub const DEFAULT_EXTRA_DAYS: u32 = 2;

/// Extra leave days used for free-form questions.
pub const DEFAULT_ASK_EXTRA_DAYS: u32 = 2;
