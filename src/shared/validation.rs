use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating contact phone numbers
    /// Optional leading "+", then digits with optional spaces or hyphens, 6-20 characters
    /// - Valid: "01712345678", "+8801712345678", "017-1234-5678", "02 9661551"
    /// - Invalid: "abc", "12345", "+", "0171234567a"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").unwrap();
}
