mod entropy_os;
mod refresh_hasher_bcrypt;
mod token_pair_generator;
mod token_service_fake;
mod token_service_impl;
mod token_signer_jwt;

pub use entropy_os::*;
pub use refresh_hasher_bcrypt::*;
pub use token_pair_generator::*;
pub use token_service_fake::*;
pub use token_service_impl::*;
pub use token_signer_jwt::*;

#[cfg(test)]
pub(crate) mod test_support;
