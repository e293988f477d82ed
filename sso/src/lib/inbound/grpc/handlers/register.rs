use tonic::Status;

use super::to_status;
use super::ValidationError;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::context::RequestContext;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: AuthServicePort>(
    service: &S,
    ctx: &RequestContext,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    validate(&request)?;

    let user_id = service
        .register(ctx, &request.email, &request.password)
        .await
        .map_err(|e| to_status(e, "invalid credentials"))?;

    Ok(RegisterResponse { user_id: user_id.0 })
}

fn validate(request: &RegisterRequest) -> Result<(), ValidationError> {
    if request.email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }

    if request.password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }

    Ok(())
}
