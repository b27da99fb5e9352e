use marquee_models::{Movie, MovieDraft, MovieFlag, NewReview, Review};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

const MOVIES: &str = "movies";
const REVIEWS: &str = "reviews";

/// Base URL and key of a PostgREST endpoint (`<url>/rest/v1/<table>`)
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    api_key: String,
}

impl Endpoint {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| StoreError::Unavailable("API key contains invalid characters".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| StoreError::Unavailable("API key contains invalid characters".to_string()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn get(&self, client: &Client, table: &str) -> Result<RequestBuilder, StoreError> {
        Ok(client.get(self.table_url(table)).headers(self.headers()?))
    }

    fn head(&self, client: &Client, table: &str) -> Result<RequestBuilder, StoreError> {
        Ok(client.head(self.table_url(table)).headers(self.headers()?))
    }

    fn post(&self, client: &Client, table: &str) -> Result<RequestBuilder, StoreError> {
        Ok(client
            .post(self.table_url(table))
            .headers(self.headers()?)
            .header("Prefer", "return=representation"))
    }

    fn patch(&self, client: &Client, table: &str) -> Result<RequestBuilder, StoreError> {
        Ok(client
            .patch(self.table_url(table))
            .headers(self.headers()?)
            .header("Prefer", "return=representation"))
    }

    fn delete(&self, client: &Client, table: &str) -> Result<RequestBuilder, StoreError> {
        Ok(client
            .delete(self.table_url(table))
            .headers(self.headers()?)
            .header("Prefer", "return=representation"))
    }
}

#[derive(Debug, Serialize)]
struct MovieInsert<'a> {
    #[serde(flatten)]
    draft: &'a MovieDraft,
    watched: bool,
    favorite: bool,
}

/// Error body PostgREST sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// Total from a `Content-Range` header: "0-24/3573" or "*/0"
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

/// Build a readable message from a PostgREST error body, falling back to the raw text
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let mut parts: Vec<String> = Vec::new();
            if let Some(message) = parsed.message {
                parts.push(message);
            }
            if let Some(details) = parsed.details {
                parts.push(details);
            }
            if let Some(hint) = parsed.hint {
                parts.push(format!("hint: {}", hint));
            }
            if parts.is_empty() {
                body.to_string()
            } else {
                parts.join(" - ")
            }
        }
        Err(_) => body.trim().to_string(),
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

async fn rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
    let response = check(response).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes with `return=representation` echo the touched rows; none means no such id
fn expect_touched<T>(touched: Vec<T>, id: &str) -> Result<(), StoreError> {
    if touched.is_empty() {
        Err(StoreError::NotFound {
            entity: "movie",
            id: id.to_string(),
        })
    } else {
        Ok(())
    }
}

pub async fn list_movies(client: &Client, endpoint: &Endpoint) -> Result<Vec<Movie>, StoreError> {
    debug!("GET {} ordered by created_at desc", MOVIES);
    let response = endpoint
        .get(client, MOVIES)?
        .query(&[("select", "*"), ("order", "created_at.desc")])
        .send()
        .await?;
    rows(response).await
}

pub async fn insert_movie(client: &Client, endpoint: &Endpoint, draft: &MovieDraft) -> Result<Movie, StoreError> {
    debug!("POST {} title={}", MOVIES, draft.title);
    let body = MovieInsert {
        draft,
        watched: false,
        favorite: false,
    };
    let response = endpoint.post(client, MOVIES)?.json(&body).send().await?;
    rows::<Movie>(response)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Decode("insert returned no movie row".to_string()))
}

pub async fn update_movie(client: &Client, endpoint: &Endpoint, id: &str, draft: &MovieDraft) -> Result<(), StoreError> {
    debug!("PATCH {} id={}", MOVIES, id);
    let response = endpoint
        .patch(client, MOVIES)?
        .query(&[("id", eq(id))])
        .json(draft)
        .send()
        .await?;
    expect_touched(rows::<serde_json::Value>(response).await?, id)
}

pub async fn set_movie_flag(
    client: &Client,
    endpoint: &Endpoint,
    id: &str,
    flag: MovieFlag,
    value: bool,
) -> Result<(), StoreError> {
    debug!("PATCH {} id={} {}={}", MOVIES, id, flag.column(), value);
    let mut body = serde_json::Map::new();
    body.insert(flag.column().to_string(), serde_json::Value::Bool(value));
    let response = endpoint
        .patch(client, MOVIES)?
        .query(&[("id", eq(id))])
        .json(&body)
        .send()
        .await?;
    expect_touched(rows::<serde_json::Value>(response).await?, id)
}

pub async fn delete_movie(client: &Client, endpoint: &Endpoint, id: &str) -> Result<(), StoreError> {
    debug!("DELETE {} id={} (reviews cascade)", MOVIES, id);
    let response = endpoint
        .delete(client, MOVIES)?
        .query(&[("id", eq(id))])
        .send()
        .await?;
    expect_touched(rows::<serde_json::Value>(response).await?, id)
}

pub async fn list_reviews(client: &Client, endpoint: &Endpoint, movie_id: &str) -> Result<Vec<Review>, StoreError> {
    debug!("GET {} movie_id={}", REVIEWS, movie_id);
    let response = endpoint
        .get(client, REVIEWS)?
        .query(&[
            ("select", "*".to_string()),
            ("movie_id", eq(movie_id)),
            ("order", "created_at.desc".to_string()),
        ])
        .send()
        .await?;
    rows(response).await
}

pub async fn count_reviews(client: &Client, endpoint: &Endpoint, movie_id: Option<&str>) -> Result<u64, StoreError> {
    debug!("HEAD {} count=exact movie_id={:?}", REVIEWS, movie_id);
    let mut request = endpoint
        .head(client, REVIEWS)?
        .header("Prefer", "count=exact")
        .query(&[("select", "*")]);
    if let Some(id) = movie_id {
        request = request.query(&[("movie_id", eq(id))]);
    }

    let response = check(request.send().await?).await?;
    let header = response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| StoreError::Decode("count response has no Content-Range header".to_string()))?;
    parse_content_range_total(header)
        .ok_or_else(|| StoreError::Decode(format!("unexpected Content-Range: {}", header)))
}

pub async fn latest_reviews(
    client: &Client,
    endpoint: &Endpoint,
    movie_id: Option<&str>,
    limit: usize,
) -> Result<Vec<Review>, StoreError> {
    debug!("GET {} latest {} movie_id={:?}", REVIEWS, limit, movie_id);
    let mut request = endpoint.get(client, REVIEWS)?.query(&[
        ("select", "*".to_string()),
        ("order", "created_at.desc".to_string()),
        ("limit", limit.to_string()),
    ]);
    if let Some(id) = movie_id {
        request = request.query(&[("movie_id", eq(id))]);
    }
    rows(request.send().await?).await
}

pub async fn insert_review(client: &Client, endpoint: &Endpoint, review: &NewReview) -> Result<Review, StoreError> {
    debug!("POST {} movie_id={}", REVIEWS, review.movie_id);
    let response = endpoint.post(client, REVIEWS)?.json(review).send().await?;
    rows::<Review>(response)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Decode("insert returned no review row".to_string()))
}
