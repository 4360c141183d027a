use axum::Json;
use service_core::error::MessageBody;

pub async fn hello() -> Json<MessageBody<&'static str>> {
    Json(MessageBody {
        message: "hello mom!",
    })
}
