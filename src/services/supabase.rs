use crate::models::SkillProfile;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Rows requested per page, PostgREST's default `max_rows`
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Table names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub profiles: String,
    pub skills_teach: String,
    pub skills_learn: String,
    /// Column that orders a user's skill rows, usually the primary key
    pub skills_order_column: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            profiles: "profiles".to_string(),
            skills_teach: "user_skills_teach".to_string(),
            skills_learn: "user_skills_learn".to_string(),
            skills_order_column: "id".to_string(),
        }
    }
}

/// Row of the profiles table
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Row of either skills table
#[derive(Debug, Clone, Deserialize)]
pub struct SkillRow {
    pub user_id: String,
    pub skill_name: String,
}

/// One user's profile plus the population it was read with
#[derive(Debug, Clone)]
pub struct PopulationSnapshot {
    pub subject: SkillProfile,
    pub population: Vec<SkillProfile>,
}

struct Page<T> {
    rows: Vec<T>,
    total: Option<usize>,
}

/// Supabase REST client for profile and skill data
///
/// Reads go through PostgREST (`/rest/v1/<table>`) in `Range` pages with an
/// exact count, and a read only succeeds once every counted row arrived.
/// Every read returns complete profiles: a user with no skill rows gets
/// empty lists rather than being dropped.
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
    page_size: usize,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: SupabaseTables,
        timeout_secs: u64,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Set the number of rows requested per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn skill_query(&self, filter: Option<&str>) -> String {
        let mut query = format!(
            "select=user_id,skill_name&order=user_id.asc,{}.asc",
            self.tables.skills_order_column
        );
        if let Some(filter) = filter {
            query.push('&');
            query.push_str(filter);
        }
        query
    }

    async fn fetch_page<T>(&self, table: &str, query: &str, offset: usize) -> Result<Page<T>, SupabaseError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}?{}", self.table_url(table), query);
        let range = format!("{}-{}", offset, offset + self.page_size - 1);

        tracing::debug!("Fetching rows {} from: {}", range, url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Range-Unit", "items")
            .header("Range", range)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }

        let total = content_range_total(response.headers());

        // Offset at or past the end of the table
        if status == reqwest::StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(Page { rows: Vec::new(), total });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Supabase query on {} failed: {} - {}", table, status, body);
            return Err(SupabaseError::ApiError(format!(
                "Failed to query {}: {}",
                table, status
            )));
        }

        let body = response.text().await?;
        let rows = serde_json::from_str(&body).map_err(|e| {
            SupabaseError::InvalidResponse(format!("Failed to parse {} rows: {}", table, e))
        })?;

        Ok(Page { rows, total })
    }

    /// Read every row matching `query`, page by page
    ///
    /// With a server count, pages are requested until that many rows have
    /// arrived; a shortfall fails the read. Without one, a short page ends it.
    async fn fetch_rows<T>(&self, table: &str, query: &str) -> Result<Vec<T>, SupabaseError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut rows: Vec<T> = Vec::new();
        let mut expected = None;

        loop {
            let page = self.fetch_page::<T>(table, query, rows.len()).await?;
            if page.total.is_some() {
                expected = page.total;
            }

            let fetched = page.rows.len();
            rows.extend(page.rows);

            let done = match expected {
                Some(total) => fetched == 0 || rows.len() >= total,
                None => fetched < self.page_size,
            };
            if done {
                break;
            }
        }

        if let Some(total) = expected {
            if rows.len() != total {
                tracing::error!(
                    "Incomplete read of {}: {} of {} rows",
                    table,
                    rows.len(),
                    total
                );
                return Err(SupabaseError::InvalidResponse(format!(
                    "Incomplete read of {}: got {} of {} rows",
                    table,
                    rows.len(),
                    total
                )));
            }
        }

        Ok(rows)
    }

    /// Fetch one user's profile with both skill lists
    pub async fn get_profile(&self, user_id: &str) -> Result<SkillProfile, SupabaseError> {
        let filter = format!("id=eq.{}", urlencoding::encode(user_id));
        let profile_query = format!("select=id,name,bio,avatar&{}", filter);

        let rows: Vec<ProfileRow> = self.fetch_rows(&self.tables.profiles, &profile_query).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(format!("Profile not found for user {}", user_id)))?;

        let user_filter = format!("user_id=eq.{}", urlencoding::encode(user_id));
        let skill_query = self.skill_query(Some(&user_filter));
        let teach: Vec<SkillRow> = self.fetch_rows(&self.tables.skills_teach, &skill_query).await?;
        let learn: Vec<SkillRow> = self.fetch_rows(&self.tables.skills_learn, &skill_query).await?;

        tracing::debug!(
            "Loaded profile {} ({} teach, {} learn)",
            user_id,
            teach.len(),
            learn.len()
        );

        assemble_profiles(vec![row], teach, learn)
            .pop()
            .ok_or_else(|| SupabaseError::NotFound(format!("Profile not found for user {}", user_id)))
    }

    /// Fetch every profile with its skills as one snapshot
    pub async fn list_profiles(&self) -> Result<Vec<SkillProfile>, SupabaseError> {
        let profiles: Vec<ProfileRow> = self
            .fetch_rows(&self.tables.profiles, "select=id,name,bio,avatar&order=id.asc")
            .await?;
        let skill_query = self.skill_query(None);
        let teach: Vec<SkillRow> = self.fetch_rows(&self.tables.skills_teach, &skill_query).await?;
        let learn: Vec<SkillRow> = self.fetch_rows(&self.tables.skills_learn, &skill_query).await?;

        tracing::debug!(
            "Loaded snapshot: {} profiles, {} teach rows, {} learn rows",
            profiles.len(),
            teach.len(),
            learn.len()
        );

        Ok(assemble_profiles(profiles, teach, learn))
    }

    /// Read the population once and take `user_id`'s profile out of it
    pub async fn snapshot_for(&self, user_id: &str) -> Result<PopulationSnapshot, SupabaseError> {
        let population = self.list_profiles().await?;
        let subject = population
            .iter()
            .find(|profile| profile.id == user_id)
            .cloned()
            .ok_or_else(|| SupabaseError::NotFound(format!("Profile not found for user {}", user_id)))?;

        Ok(PopulationSnapshot { subject, population })
    }
}

/// Total row count from a `Content-Range` header (`0-999/1234`, `*/0`)
fn content_range_total(headers: &reqwest::header::HeaderMap) -> Option<usize> {
    headers
        .get(reqwest::header::CONTENT_RANGE)?
        .to_str()
        .ok()?
        .rsplit('/')
        .next()?
        .parse()
        .ok()
}

/// Join profile rows with their skill rows
///
/// Profile order and per-user skill row order are preserved. Skill rows whose
/// user has no profile row are ignored.
pub fn assemble_profiles(
    profiles: Vec<ProfileRow>,
    teach: Vec<SkillRow>,
    learn: Vec<SkillRow>,
) -> Vec<SkillProfile> {
    let mut teach_by_user = group_skills(teach);
    let mut learn_by_user = group_skills(learn);

    profiles
        .into_iter()
        .map(|row| SkillProfile {
            skills_to_teach: teach_by_user.remove(&row.id).unwrap_or_default(),
            skills_to_learn: learn_by_user.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            bio: row.bio,
            avatar: row.avatar,
        })
        .collect()
}

fn group_skills(rows: Vec<SkillRow>) -> HashMap<String, Vec<String>> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.user_id).or_default().push(row.skill_name);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_row(id: &str) -> ProfileRow {
        ProfileRow {
            id: id.to_string(),
            name: format!("User {}", id),
            bio: None,
            avatar: None,
        }
    }

    fn skill_row(user_id: &str, skill: &str) -> SkillRow {
        SkillRow {
            user_id: user_id.to_string(),
            skill_name: skill.to_string(),
        }
    }

    #[test]
    fn test_supabase_client_creation() {
        let client = SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "test_key".to_string(),
            SupabaseTables::default(),
            30,
        )
        .unwrap();

        assert_eq!(client.api_key, "test_key");
        assert_eq!(
            client.table_url("profiles"),
            "https://project.supabase.co/rest/v1/profiles"
        );
    }

    #[test]
    fn test_content_range_total() {
        use reqwest::header::{HeaderMap, HeaderValue, CONTENT_RANGE};

        let mut headers = HeaderMap::new();
        assert_eq!(content_range_total(&headers), None);

        headers.insert(CONTENT_RANGE, HeaderValue::from_static("0-999/1001"));
        assert_eq!(content_range_total(&headers), Some(1001));

        headers.insert(CONTENT_RANGE, HeaderValue::from_static("*/0"));
        assert_eq!(content_range_total(&headers), Some(0));

        headers.insert(CONTENT_RANGE, HeaderValue::from_static("0-24/*"));
        assert_eq!(content_range_total(&headers), None);
    }

    #[test]
    fn test_skill_query_orders_rows() {
        let client = SupabaseClient::new(
            "http://localhost".to_string(),
            "k".to_string(),
            SupabaseTables::default(),
            5,
        )
        .unwrap();

        assert_eq!(
            client.skill_query(Some("user_id=eq.u1")),
            "select=user_id,skill_name&order=user_id.asc,id.asc&user_id=eq.u1"
        );
    }

    #[test]
    fn test_assemble_profiles() {
        let profiles = vec![profile_row("a"), profile_row("b")];
        let teach = vec![
            skill_row("a", "Rust"),
            skill_row("b", "Go"),
            skill_row("a", "Rust"),
            skill_row("ghost", "Cobol"),
        ];
        let learn = vec![skill_row("b", "Python")];

        let assembled = assemble_profiles(profiles, teach, learn);

        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].id, "a");
        assert_eq!(assembled[0].skills_to_teach, vec!["Rust", "Rust"]);
        assert!(assembled[0].skills_to_learn.is_empty());
        assert_eq!(assembled[1].skills_to_teach, vec!["Go"]);
        assert_eq!(assembled[1].skills_to_learn, vec!["Python"]);
    }
}
