pub mod currency;
pub mod date;
pub mod format_code;
pub mod number;
