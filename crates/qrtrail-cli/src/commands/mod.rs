pub mod generate;
pub mod history;
pub mod scan;
pub mod session;
