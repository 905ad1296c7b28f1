pub mod admin;
pub mod auth;
pub mod experts;
pub mod password;
pub mod profile;
pub mod register;
pub mod route;
