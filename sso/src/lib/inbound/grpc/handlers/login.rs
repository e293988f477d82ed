use tonic::Status;

use super::to_status;
use super::ValidationError;
use crate::domain::auth::models::AppId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::context::RequestContext;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login<S: AuthServicePort>(
    service: &S,
    ctx: &RequestContext,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    validate(&request)?;

    let token = service
        .login(
            ctx,
            &request.email,
            &request.password,
            AppId(request.app_id),
        )
        .await
        .map_err(|e| to_status(e, "invalid email or password"))?;

    Ok(LoginResponse { token })
}

fn validate(request: &LoginRequest) -> Result<(), ValidationError> {
    if request.email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }

    if request.password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }

    if request.app_id == 0 {
        return Err(ValidationError::MissingAppId);
    }

    Ok(())
}
