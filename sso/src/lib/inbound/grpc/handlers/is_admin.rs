use tonic::Status;

use super::to_status;
use super::ValidationError;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::context::RequestContext;
use crate::proto::IsAdminRequest;
use crate::proto::IsAdminResponse;

pub async fn is_admin<S: AuthServicePort>(
    service: &S,
    ctx: &RequestContext,
    request: IsAdminRequest,
) -> Result<IsAdminResponse, Status> {
    if request.user_id == 0 {
        return Err(ValidationError::MissingUserId.into());
    }

    let is_admin = service
        .is_admin(ctx, UserId(request.user_id))
        .await
        .map_err(|e| to_status(e, "invalid credentials"))?;

    Ok(IsAdminResponse { is_admin })
}
