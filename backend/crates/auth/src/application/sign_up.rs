//! Sign Up Use Case
//!
//! Registers a (user name, email) pair and mails a confirmation code.
//!
//! | existing records                         | outcome                    |
//! |------------------------------------------|----------------------------|
//! | exact pair exists                        | re-send code, success      |
//! | user name exists with another email      | `UserNameTaken`            |
//! | email exists under another user name     | `EmailTaken`               |
//! | neither                                  | create user, send code     |
//!
//! `me` is rejected before any lookup.

use std::sync::Arc;

use platform::mail::{MailMessage, Mailer, dispatch_detached};

use crate::application::config::AuthConfig;
use crate::application::confirmation::ConfirmationCodes;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub user_name: Option<String>,
    pub email: Option<String>,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_name: UserName,
    pub email: Email,
    /// False when an existing pair was re-confirmed
    pub created: bool,
}

/// Sign up use case
pub struct SignUpUseCase<R, M>
where
    R: UserRepository,
    M: Mailer + Sync + 'static,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    codes: Arc<ConfirmationCodes>,
    config: Arc<AuthConfig>,
}

impl<R, M> SignUpUseCase<R, M>
where
    R: UserRepository,
    M: Mailer + Sync + 'static,
{
    pub fn new(
        repo: Arc<R>,
        mailer: Arc<M>,
        codes: Arc<ConfirmationCodes>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            mailer,
            codes,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let (raw_name, raw_email) = match (input.user_name, input.email) {
            (Some(name), Some(email)) => (name, email),
            (None, Some(_)) => return Err(required("username")),
            (Some(_), None) => return Err(required("email")),
            (None, None) => return Err(required("username, email")),
        };

        if UserName::is_reserved(&raw_name) {
            return Err(AuthError::Validation(
                "username: 'me' cannot be used as a user name".to_string(),
            ));
        }

        let user_name =
            UserName::new(&raw_name).map_err(|e| AuthError::Validation(format!("username: {e}")))?;
        let email = Email::new(raw_email)
            .map_err(|e| AuthError::Validation(format!("email: {}", e.message())))?;

        // Idempotent re-request
        if let Some(user) = self.repo.find_by_credentials(&user_name, &email).await? {
            self.send_code(&user);
            tracing::info!(user_id = %user.user_id, "Confirmation code re-sent");
            return Ok(SignUpOutput {
                user_name,
                email,
                created: false,
            });
        }

        if self.repo.find_by_user_name(&user_name).await?.is_some() {
            return Err(AuthError::UserNameTaken);
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(user_name.clone(), email.clone());
        // A concurrent sign-up can still win the race; the unique constraints report it
        self.repo.create(&user).await?;

        self.send_code(&user);

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up"
        );

        Ok(SignUpOutput {
            user_name,
            email,
            created: true,
        })
    }

    fn send_code(&self, user: &User) {
        let code = self.codes.issue(user);
        let message = MailMessage::new(
            self.config.mail_from.clone(),
            user.email.as_str(),
            "Registration confirmation",
            format!(
                "To obtain an API token send POST /api/v1/auth/token with your username and \
                 this confirmation_code: {}",
                code.as_str()
            ),
        );
        dispatch_detached(self.mailer.clone(), message);
    }
}

fn required(fields: &str) -> AuthError {
    AuthError::Validation(format!("{fields}: This field is required."))
}
