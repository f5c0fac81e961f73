use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;

use crate::{config::Config, error::AppResult};

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    image_base_url: String,
    language: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        if config.tmdb_access_token.trim().is_empty() {
            tracing::warn!("no TMDB_ACCESS_TOKEN provided, metadata requests will be rejected");
        }

        let rps = NonZeroU32::new(config.tmdb_rps).unwrap_or(NonZeroU32::MIN);
        Self {
            client,
            access_token: config.tmdb_access_token.clone(),
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.tmdb_image_base_url.trim_end_matches('/').to_string(),
            language: config.tmdb_language.clone(),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rps))),
        }
    }

    pub async fn search_movies(&self, title: &str) -> AppResult<Vec<SearchResult>> {
        self.limiter.until_ready().await;

        let url = format!("{}/search/movie", self.base_url);
        let resp: SearchResponse = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("query", title),
                ("include_adult", "false"),
                ("language", self.language.as_str()),
                ("page", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(title = %title, results = resp.results.len(), "searched TMDB");
        Ok(resp.results)
    }

    pub async fn movie_details(&self, tmdb_id: i32) -> AppResult<MovieDetails> {
        self.limiter.until_ready().await;

        let url = format!("{}/movie/{}", self.base_url, tmdb_id);
        let details = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("language", &self.language)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(details)
    }

    pub async fn movie_credits(&self, tmdb_id: i32) -> AppResult<Credits> {
        self.limiter.until_ready().await;

        let url = format!("{}/movie/{}/credits", self.base_url, tmdb_id);
        let credits = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("language", &self.language)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(credits)
    }

    /// Absolute URL for a provider image path such as `/abc.jpg`.
    pub fn image_url(&self, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        Some(format!("{}/{}", self.image_base_url, path.trim_start_matches('/')))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchResult {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MovieDetails {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub belongs_to_collection: Option<CollectionRef>,
    #[serde(default)]
    pub genres: Vec<GenreRef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CollectionRef {
    pub name: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenreRef {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CastMember {
    pub original_name: String,
    #[serde(default)]
    pub gender: Option<i32>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
}

/// Leading year component of a provider date such as `1999-03-30`.
pub fn release_year(release_date: Option<&str>) -> Option<i32> {
    release_date?.split('-').next()?.trim().parse().ok()
}
