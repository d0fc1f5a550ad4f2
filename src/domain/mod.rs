// Domain layer - trajectory, selection and query models
pub mod query;
pub mod selection;
pub mod summary;
pub mod trajectory;
