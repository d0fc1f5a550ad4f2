// Application layer - use cases and the ports they drive
pub mod acoustic_repository;
pub mod collaborators;
pub mod dispatcher;
pub mod session;
pub mod trajectory_service;
