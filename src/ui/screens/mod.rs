pub(crate) mod dashboard;
pub(crate) mod goals;
pub(crate) mod history;
pub(crate) mod insights;
pub(crate) mod value_map;
