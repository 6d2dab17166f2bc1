/// Binary decode command.
pub mod decode;
/// JSON encode command.
pub mod encode;
/// Schema inspection command.
pub mod schema;
/// Shared CLI helpers.
pub(crate) mod util;

#[cfg(test)]
mod test_support;
