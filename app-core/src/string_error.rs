//! Turning arbitrary errors into messages for the UI and the command line.

use std::fmt::Display;

pub trait ErrorStringExt<T> {
    /// Replace the error by `"context: error"`.
    fn err_to_string(self, context: &str) -> Result<T, String>;
}

impl<T, E: Display> ErrorStringExt<T> for Result<T, E> {
    fn err_to_string(self, context: &str) -> Result<T, String> {
        self.map_err(|err| format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_err_to_string_prefixes_context() {
        let res: Result<u8, _> = "x".parse::<u8>().err_to_string("bad width");
        assert_eq!(res, Err("bad width: invalid digit found in string".to_string()));
        let ok: Result<u8, String> = "7".parse::<u8>().err_to_string("bad width");
        assert_eq!(ok, Ok(7));
    }
}
