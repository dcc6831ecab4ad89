pub mod completion;
pub mod detect;
pub mod generate;
