//! Authentication

mod login;
mod token;

pub use login::LoginRequest;
pub use login::LoginResponse;
pub use token::AuthToken;
pub use token::SharedTokenProvider;
pub use token::StaticTokenProvider;
pub use token::TOKEN_SCHEME;
pub use token::TokenProvider;
