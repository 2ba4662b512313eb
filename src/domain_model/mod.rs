mod credential;
mod subject;

pub use credential::*;
pub use subject::*;
