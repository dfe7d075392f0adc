/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Archive root; pages live at `<base>ap<YYMMDD>.html` and image paths are relative to it
pub(crate) const DEFAULT_BASE_URL: &str = "https://apod.nasa.gov/apod/";

/// First day the archive has an entry for
pub(crate) const FIRST_APOD_DATE: (i32, u32, u32) = (1995, 6, 16);

/// Height the on-screen preview is scaled to
pub(crate) const PREVIEW_HEIGHT: u32 = 500;

/// Directory created under the user's pictures directory for downloads
pub(crate) const SAVE_SUBDIR: &str = "APOD";
