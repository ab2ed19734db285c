pub mod batch;
pub mod caption;
pub mod charts;
pub mod generate;
pub mod prompts;
