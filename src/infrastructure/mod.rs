// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_presenter;
pub mod geojson_map;
pub mod http_repository;
