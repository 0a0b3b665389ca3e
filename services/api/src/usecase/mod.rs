pub mod auth;
pub mod feedback;
pub mod notification;
pub mod oauth;
pub mod password;
pub mod reminder;
pub mod session;
pub mod token;
pub mod user;
