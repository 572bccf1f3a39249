pub mod client;
pub mod issue;
