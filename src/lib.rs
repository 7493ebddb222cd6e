pub mod convert;
pub mod marker;
pub mod output;
pub mod process;
