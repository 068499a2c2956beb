//! Authentication service: registration, login and token validation.

use tracing::{error, info, warn};
use youmeet_config::AuthConfig;
use youmeet_database::{
    Company, CompanyRepository, Professional, ProfessionalRepository, Role, Session,
    SessionRepository, SharedStorage, StorageError, User, UserRepository,
};

use crate::types::{AuthError, AuthResponse, AuthResult, LoginRequest, RegisterRequest};
use crate::utils::validation::{validate_email, validate_name, validate_password};
use crate::utils::PasswordHasherConfig;

/// Only this much of a token ever reaches the logs.
fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}

/// Service for managing authentication operations
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    companies: CompanyRepository,
    professionals: ProfessionalRepository,
    sessions: SessionRepository,
    hasher: PasswordHasherConfig,
    /// Checked on logins for unknown emails so they cost the same as real ones.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(storage: SharedStorage, config: &AuthConfig) -> AuthResult<Self> {
        let hasher = PasswordHasherConfig::from_config(config)?;
        let dummy_hash = hasher.hash_password(&uuid::Uuid::new_v4().to_string())?;
        Ok(Self {
            users: UserRepository::new(storage.clone()),
            companies: CompanyRepository::new(storage.clone()),
            professionals: ProfessionalRepository::new(storage.clone()),
            sessions: SessionRepository::new(storage),
            hasher,
            dummy_hash,
        })
    }

    /// Register a new account and create the profile its role calls for.
    ///
    /// Company accounts get a [`Company`], professional accounts an independent
    /// [`Professional`], clients nothing else. If the profile cannot be stored
    /// the user row is deleted again and the call fails with `Persistence`.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        match self.users.get_by_email(&request.email).await {
            Ok(_) => return Err(AuthError::DuplicateEmail),
            Err(StorageError::NotFound(_)) => {}
            Err(err) => return Err(AuthError::Persistence(err.to_string())),
        }

        let role: Role = request
            .role
            .parse()
            .map_err(|_| AuthError::InvalidRole(request.role.clone()))?;

        validate_name(&request.name)?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let password_hash = self.hasher.hash_password_blocking(&request.password).await?;
        let user = User::new(request.name, request.email, password_hash, role);

        self.users.create(&user).await.map_err(|err| match err {
            StorageError::Duplicate(_) => AuthError::DuplicateEmail,
            other => AuthError::Persistence(other.to_string()),
        })?;

        if let Err(err) = self.create_profile(&user).await {
            warn!(user_id = %user.id, role = %role, error = %err, "profile creation failed, removing user");
            if let Err(cleanup) = self.users.delete(user.id).await {
                error!(user_id = %user.id, error = %cleanup, "failed to remove user after profile error");
            }
            return Err(AuthError::Persistence(err.to_string()));
        }

        info!(user_id = %user.id, role = %role, "user registered");
        Ok(user)
    }

    async fn create_profile(&self, user: &User) -> Result<(), StorageError> {
        match user.role {
            Role::Client => Ok(()),
            Role::Company => {
                let company = Company::new(user.id, user.name.clone());
                self.companies.create_company(&company).await
            }
            Role::Professional => {
                let professional = Professional::independent(user.id, user.name.clone());
                self.professionals.create_professional(&professional).await
            }
        }
    }

    /// Verify credentials and open a session.
    ///
    /// An unknown email and a wrong password fail with the same error.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<AuthResponse> {
        let user = match self.users.get_by_email(&request.email).await {
            Ok(user) => user,
            Err(err) => {
                if err.is_not_found() {
                    warn!(email = %request.email, "login failed");
                } else {
                    error!(error = %err, "user lookup failed during login");
                }
                self.hasher
                    .verify_password_blocking(&request.password, &self.dummy_hash)
                    .await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify_password_blocking(&request.password, &user.password_hash)
            .await
        {
            warn!(email = %request.email, "login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::issue(user.id);
        self.sessions.create_session(&session).await?;

        info!(user_id = %user.id, token = token_prefix(&session.token), "user logged in");
        Ok(AuthResponse {
            token: session.token,
            user,
        })
    }

    /// Resolve the account behind a token issued by [`AuthService::login`].
    pub async fn validate_token(&self, token: &str) -> AuthResult<User> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let session = match self.sessions.get_by_token(token).await {
            Ok(session) => session,
            Err(StorageError::NotFound(_)) => return Err(AuthError::InvalidToken),
            Err(err) => return Err(err.into()),
        };

        match self.users.get_by_id(session.user_id).await {
            Ok(user) => Ok(user),
            Err(StorageError::NotFound(_)) => {
                warn!(token = token_prefix(token), "session refers to a missing user");
                Err(AuthError::InvalidToken)
            }
            Err(err) => Err(err.into()),
        }
    }
}
