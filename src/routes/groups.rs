use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use crate::core::{build_group, skills_without_groups};
use crate::models::{CreateGroupRequest, MembershipRequest, StudyGroupsResponse, GroupSuggestionsResponse, MembershipResponse, ErrorResponse};
use crate::routes::{matches::store_error_response, AppState};
use crate::services::PostgresError;

/// Configure all study group routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/groups", web::get().to(list_groups))
        .route("/groups", web::post().to(create_group))
        .route("/groups/suggestions", web::get().to(group_suggestions))
        .route("/groups/{group_id}/join", web::post().to(join_group))
        .route("/groups/{group_id}/leave", web::post().to(leave_group));
}

#[derive(Debug, Deserialize)]
struct UserQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

fn validation_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

/// Map a group store failure to an error response
fn db_error_response(context: &str, err: &PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: message.clone(),
            status_code: 404,
        }),
        PostgresError::Conflict(message) => HttpResponse::Conflict().json(ErrorResponse {
            error: format!("Failed to {}", context),
            message: message.clone(),
            status_code: 409,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: format!("Failed to {}", context),
            message: format!("Failed to {}, try again ({})", context, err),
            status_code: 500,
        }),
    }
}

/// List study groups
///
/// GET /api/v1/groups?userId={userId}
///
/// `userId` is optional; when present each group carries `isMember`.
async fn list_groups(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    match state.postgres.list_groups(query.user_id.as_deref()).await {
        Ok(groups) => HttpResponse::Ok().json(StudyGroupsResponse { groups }),
        Err(e) => {
            tracing::error!("Failed to list study groups: {}", e);
            db_error_response("load study groups", &e)
        }
    }
}

/// Create a study group
///
/// POST /api/v1/groups
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "skillName": "string"
/// }
/// ```
async fn create_group(
    state: web::Data<AppState>,
    req: web::Json<CreateGroupRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }
    if req.skill_name.trim().is_empty() {
        return validation_error("skillName must not be blank".to_string());
    }

    let group = build_group(&req.skill_name, &req.user_id);

    match state.postgres.create_group(&group).await {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => {
            tracing::warn!("Failed to create group for {}: {}", group.skill_name, e);
            db_error_response("create study group", &e)
        }
    }
}

/// Join a study group
///
/// POST /api/v1/groups/{groupId}/join
async fn join_group(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<MembershipRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    let group_id = path.into_inner();

    match state.postgres.join_group(group_id, &req.user_id).await {
        Ok(()) => HttpResponse::Ok().json(MembershipResponse {
            success: true,
            group_id,
        }),
        Err(e) => {
            tracing::warn!("User {} failed to join {}: {}", req.user_id, group_id, e);
            db_error_response("join study group", &e)
        }
    }
}

/// Leave a study group
///
/// POST /api/v1/groups/{groupId}/leave
///
/// `success` is false when the user was not a member.
async fn leave_group(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<MembershipRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    let group_id = path.into_inner();

    match state.postgres.leave_group(group_id, &req.user_id).await {
        Ok(removed) => HttpResponse::Ok().json(MembershipResponse {
            success: removed,
            group_id,
        }),
        Err(e) => {
            tracing::error!("User {} failed to leave {}: {}", req.user_id, group_id, e);
            db_error_response("leave study group", &e)
        }
    }
}

/// Skills of the user that have no group yet
///
/// GET /api/v1/groups/suggestions?userId={userId}
async fn group_suggestions(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    let user_id = match query.user_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return validation_error("userId query parameter is required".to_string()),
    };

    let profile = match state.supabase.get_profile(user_id).await {
        Ok(profile) => profile,
        Err(e) => return store_error_response("profile", &e),
    };

    let groups = match state.postgres.list_groups(None).await {
        Ok(groups) => groups,
        Err(e) => return db_error_response("load study groups", &e),
    };

    HttpResponse::Ok().json(GroupSuggestionsResponse {
        user_id: user_id.to_string(),
        skills: skills_without_groups(profile.all_skills(), &groups),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let response = db_error_response("join study group", &PostgresError::Conflict("dup".to_string()));
        assert_eq!(response.status(), 409);
    }

    #[test]
    fn test_missing_group_maps_to_404() {
        let response = db_error_response("join study group", &PostgresError::NotFound("g".to_string()));
        assert_eq!(response.status(), 404);
    }
}
