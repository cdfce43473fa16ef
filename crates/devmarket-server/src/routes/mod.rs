pub mod admin;
pub mod ads;
pub mod contact;
pub mod donations;
pub mod gateways;
pub mod health;
pub mod pages;
