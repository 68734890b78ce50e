//! Application Layer
//!
//! Use cases and application services.

pub mod admin_users;
pub mod config;
pub mod confirmation;
pub mod current_user;
pub mod obtain_token;
pub mod refresh_token;
pub mod sign_up;
pub mod token;

// Re-exports
pub use admin_users::{AdminPatch, AdminUsersUseCase, CreateUserInput};
pub use config::AuthConfig;
pub use confirmation::{Clock, ConfirmationCodes, SystemClock};
pub use current_user::{CurrentUserUseCase, ProfilePatch};
pub use obtain_token::{ObtainTokenInput, ObtainTokenUseCase};
pub use refresh_token::RefreshTokenUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{Claims, TokenPair, TokenService, TokenType};
