pub mod cache;
pub mod config;
pub mod controllers;
pub mod forms;
pub mod gateway;
pub mod model;
pub mod notify;
pub mod pages;
pub mod session;
pub mod storage;
pub mod view;
