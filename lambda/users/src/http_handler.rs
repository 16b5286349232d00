use lambda_http::{tracing, Body, Error, Request, RequestExt, Response};
use serde::Serialize;

use crate::error::UserError;
use crate::table::UserTable;
use crate::users::{create_user, delete_user, get_user, list_users};

const RESOURCE_PREFIX: &str = "/users";
const INVALID_REQUEST: &str = "Invalid request";

enum Reply {
    Json(u16, String),
    Text(u16, String),
    Empty(u16),
}

impl Reply {
    fn json<T: Serialize>(status: u16, data: &T) -> Result<Self, UserError> {
        Ok(Reply::Json(status, serde_json::to_string(data)?))
    }

    fn into_response(self) -> Result<Response<Body>, Error> {
        let response = match self {
            Reply::Json(status, body) => Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::Text(body))?,
            Reply::Text(status, body) => Response::builder()
                .status(status)
                .body(Body::Text(body))?,
            Reply::Empty(status) => Response::builder().status(status).body(Body::Empty)?,
        };
        Ok(response)
    }
}

async fn route<T: UserTable + ?Sized>(
    table: &T,
    method: &str,
    user_id: Option<&str>,
    body: &[u8],
) -> Result<Reply, UserError> {
    match (method, user_id) {
        ("GET", None) => {
            let users = list_users(table).await?;
            Reply::json(200, &users)
        }
        ("GET", Some(user_id)) => match get_user(table, user_id).await? {
            Some(user) => Reply::json(200, &user),
            None => Ok(Reply::Empty(404)),
        },
        ("POST", _) => {
            let user = create_user(table, body).await?;
            Reply::json(201, &user)
        }
        ("DELETE", user_id) => {
            delete_user(table, user_id.unwrap_or_default()).await?;
            Ok(Reply::Empty(204))
        }
        _ => Ok(Reply::Text(400, INVALID_REQUEST.to_string())),
    }
}

pub(crate) async fn function_handler<T: UserTable + ?Sized>(
    table: &T,
    event: Request,
) -> Result<Response<Body>, Error> {
    // The URI carries the API Gateway stage; the raw path is what the client asked for
    let path = match event.raw_http_path() {
        "" => event.uri().path(),
        raw => raw,
    };
    let method = event.method().as_str();
    tracing::info!(method, path, "handling request");

    // Checked before anything touches the table
    if !path.starts_with(RESOURCE_PREFIX) {
        return Reply::Text(404, INVALID_REQUEST.to_string()).into_response();
    }

    let params = event.path_parameters();
    let user_id = params.first("id");

    let reply = match route(table, method, user_id, event.body().as_ref()).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(method, path, error = %e, "request failed");
            Reply::Text(500, format!("Request failed: {}", e))
        }
    };

    reply.into_response()
}
