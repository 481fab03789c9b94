mod service;
mod session;

pub use service::UserQueryService;
