//! Payload format ids and fixed bundle shape.

/// Version of the JSON transcript payload.
pub const FORMAT_VERSION: u32 = 1;

/// File name of a bundle on the transcript server and in the local cache.
pub const BUNDLE_FILE_NAME: &str = "bot.gamelog";

/// Number of boolean predicates graded per assignment.
pub const NUM_CONDITIONS: usize = 3;

/// Number of move-producing actions graded per assignment.
pub const NUM_ACTIONS: usize = 4;
