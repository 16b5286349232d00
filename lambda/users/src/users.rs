use lambda_http::tracing;
use uuid::Uuid;

use crate::error::UserError;
use crate::table::UserTable;
use crate::user::User;

/// Creates a user from a request body under a freshly generated id.
///
/// A body that cannot be parsed is tolerated: the user is stored with only
/// its id set.
pub(crate) async fn create_user<T: UserTable + ?Sized>(
    table: &T,
    request_data: &[u8],
) -> Result<User, UserError> {
    let user_id = Uuid::new_v4().to_string();
    tracing::info!(%user_id, "generated new user id");

    let (user, parse_error) = User::from_request(user_id, request_data);
    if let Some(e) = parse_error {
        tracing::warn!(user_id = %user.id, error = %e, "ignoring unparsable request body");
    }

    table
        .put(user.to_item())
        .await
        .map_err(UserError::storage("PutItem"))?;

    Ok(user)
}

/// Looks up one user. `Ok(None)` means no user has that id.
pub(crate) async fn get_user<T: UserTable + ?Sized>(
    table: &T,
    user_id: &str,
) -> Result<Option<User>, UserError> {
    if user_id.trim().is_empty() {
        return Err(UserError::MissingId);
    }

    let item = table
        .get(user_id)
        .await
        .map_err(UserError::storage("GetItem"))?;

    item.as_ref().map(User::try_from).transpose()
}

pub(crate) async fn list_users<T: UserTable + ?Sized>(table: &T) -> Result<Vec<User>, UserError> {
    let items = table.scan().await.map_err(UserError::storage("Scan"))?;

    items.iter().map(User::try_from).collect()
}

pub(crate) async fn delete_user<T: UserTable + ?Sized>(
    table: &T,
    user_id: &str,
) -> Result<(), UserError> {
    if user_id.is_empty() {
        return Err(UserError::MissingId);
    }

    table
        .delete(user_id)
        .await
        .map_err(UserError::storage("DeleteItem"))
}
