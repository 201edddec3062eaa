pub(crate) mod constants;
pub(crate) mod stripes;
