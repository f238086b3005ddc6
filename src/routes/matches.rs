use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{FindMatchesRequest, ScorePairRequest, FindMatchesResponse, HealthResponse, ErrorResponse};
use crate::routes::AppState;
use crate::services::SupabaseError;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/score", web::post().to(score_pair));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map a profile store failure to a retryable error response
pub(crate) fn store_error_response(context: &str, err: &SupabaseError) -> HttpResponse {
    match err {
        SupabaseError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: message.clone(),
            status_code: 404,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: format!("Failed to load {}", context),
            message: format!("Failed to load {}, try again ({})", context, err),
            status_code: 500,
        }),
    }
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20,
///   "refresh": false
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = &req.user_id;
    let limit = state.effective_limit(req.limit);

    tracing::info!("Finding matches for user: {}, limit: {}", user_id, limit);

    if let Some(cache) = &state.cache {
        if req.refresh {
            if let Err(e) = cache.invalidate_user(user_id).await {
                tracing::warn!("Failed to invalidate cached matches: {}", e);
            }
        } else {
            match cache.get_matches(user_id, limit).await {
                Ok(Some(cached)) => {
                    tracing::debug!("Serving cached matches for {}", user_id);
                    return HttpResponse::Ok().json(cached);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Match cache read failed: {}", e),
            }
        }
    }

    // Subject and candidates come from the same read
    let snapshot = match state.supabase.snapshot_for(user_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Failed to load snapshot for {}: {}", user_id, e);
            return store_error_response("matches", &e);
        }
    };

    let result = state
        .matcher
        .find_matches(&snapshot.subject, &snapshot.population, limit);

    let response = FindMatchesResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
        limit,
    };

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.put_matches(user_id, limit, &response).await {
            tracing::warn!("Failed to cache matches for {}: {}", user_id, e);
        }
    }

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        response.matches.len(),
        user_id,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Score a single pair endpoint
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "candidateId": "string"
/// }
/// ```
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let subject = match state.supabase.get_profile(&req.user_id).await {
        Ok(profile) => profile,
        Err(e) => return store_error_response("profile", &e),
    };

    let candidate = match state.supabase.get_profile(&req.candidate_id).await {
        Ok(profile) => profile,
        Err(e) => return store_error_response("profile", &e),
    };

    let result = state.matcher.score(&subject, &candidate);

    tracing::debug!(
        "Scored {} -> {}: {}",
        req.user_id,
        req.candidate_id,
        result.match_score
    );

    HttpResponse::Ok().json(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_not_found_maps_to_404() {
        let response = store_error_response("matches", &SupabaseError::NotFound("u1".to_string()));
        assert_eq!(response.status(), 404);
    }

    #[actix_web::test]
    async fn test_store_failure_is_retryable_500() {
        let response = store_error_response("matches", &SupabaseError::ApiError("boom".to_string()));
        assert_eq!(response.status(), 500);

        let body = to_bytes(response.into_body()).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error.message.starts_with("Failed to load matches, try again"));
    }
}
