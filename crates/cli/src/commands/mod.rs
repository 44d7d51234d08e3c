pub mod chat;
pub mod dashboard;
pub mod init;
pub mod tools;
