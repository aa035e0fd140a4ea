pub mod profile;
pub mod prompts;
pub mod registration;
pub mod review;
