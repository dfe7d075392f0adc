mod format;
mod json;
mod table;

pub(crate) use json::output_outcome_json;
pub(crate) use table::render_outcome;
