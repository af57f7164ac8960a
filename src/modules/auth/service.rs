use sisprof_auth::create_access_token;
use sisprof_config::JwtConfig;
use sisprof_core::{AppError, verify_password};
use sisprof_db::Store;
use sisprof_models::ids::AccountId;
use sisprof_models::identity::{CurrentAccount, LoginRequest, LoginResponse};
use sisprof_observability::{track_jwt_issued, track_login_failure, track_login_success};
use tracing::instrument;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(store, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        store: &dyn Store,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(account) = store.find_account_by_username(&dto.username).await? else {
            track_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &account.password_hash)? {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token = create_access_token(
            account.id.into_inner(),
            &account.username,
            account.roles.clone(),
            jwt_config,
        )?;

        for role in &account.roles {
            track_login_success(role.as_str());
        }
        track_jwt_issued();
        tracing::info!(account_id = %account.id, "login succeeded");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            account,
        })
    }

    #[instrument(skip(store))]
    pub async fn current_account(
        store: &dyn Store,
        account_id: AccountId,
    ) -> Result<CurrentAccount, AppError> {
        let account = store
            .get_account(account_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        let groups = account
            .roles
            .iter()
            .map(|role| role.group_name().to_string())
            .collect();

        Ok(CurrentAccount { account, groups })
    }
}
