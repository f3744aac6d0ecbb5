pub mod fields;
pub mod parser;
pub mod pipeline;
pub mod timing;
