pub mod controller;
pub mod multipart;
pub mod repository;
pub mod router;
pub mod service;
pub mod transaction_repository;
