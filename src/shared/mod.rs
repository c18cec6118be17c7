pub mod constants;
pub mod templates;
pub mod time;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
