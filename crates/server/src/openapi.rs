use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
}

#[derive(ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::complaints::list,
        crate::routes::complaints::create,
        crate::routes::complaints::get_one,
        crate::routes::complaints::update_status,
        crate::routes::complaints::remove,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            CreateComplaintRequest,
            UpdateStatusRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "complaints")
    )
)]
pub struct ApiDoc;
