pub(crate) mod browser;
pub(crate) mod date;
pub(crate) mod logging;

pub(crate) use browser::open_url;
pub(crate) use date::parse_date;
pub(crate) use logging::init_logging;
