mod create;
mod service;

pub use create::CreateClientCommand;
pub use service::ClientCommandService;
